//! External dependency reachable only through its circuit breaker.

use std::sync::Arc;
use tracing::warn;

use crate::ports::external_call::{
    ExternalCallError, ExternalCallPort, ExternalRequest, ExternalResponse,
};
use crate::ports::tool_handler::HandlerError;

use super::circuit_breaker::{BreakerError, CircuitBreaker};

/// An [`ExternalCallPort`] paired with the breaker that gates it.
///
/// Responses with a 5xx status count as failures; every other response
/// (including 404) is a healthy answer from the dependency and is returned
/// for the handler to interpret.
#[derive(Clone)]
pub struct GuardedDependency {
    name: String,
    port: Arc<dyn ExternalCallPort>,
    breaker: Arc<CircuitBreaker>,
}

impl GuardedDependency {
    pub fn new(port: Arc<dyn ExternalCallPort>, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            name: breaker.name().to_string(),
            port,
            breaker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Call the dependency through its breaker.
    pub async fn call(&self, request: ExternalRequest) -> Result<ExternalResponse, HandlerError> {
        let port = Arc::clone(&self.port);
        let outcome = self
            .breaker
            .execute(|| async move {
                let response = port.call(request).await?;
                if response.is_server_error() {
                    return Err(ExternalCallError::ServerError {
                        status: response.status,
                    });
                }
                Ok(response)
            })
            .await;

        outcome.map_err(|e| match e {
            BreakerError::Open { .. } => HandlerError::CircuitOpen(self.name.clone()),
            BreakerError::Operation(err) => {
                warn!(dependency = %self.name, error = %err, "External call failed");
                HandlerError::Dependency {
                    dependency: self.name.clone(),
                    message: err.to_string(),
                }
            }
        })
    }
}

impl std::fmt::Debug for GuardedDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedDependency")
            .field("name", &self.name)
            .field("state", &self.breaker.state())
            .finish()
    }
}
