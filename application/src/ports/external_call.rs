//! External Call port
//!
//! Abstract "call an external HTTP API" capability. Implementations live in
//! the infrastructure layer; the application only ever invokes them through
//! a circuit breaker (see [`GuardedDependency`](crate::resilience::GuardedDependency)).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A GET request relative to the dependency's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRequest {
    /// Path appended to the base URL (without leading slash)
    pub path: String,
    /// Query string pairs
    pub query: Vec<(String, String)>,
}

impl ExternalRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Response of an external call, whatever its HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalResponse {
    pub status: u16,
    /// Parsed JSON body, or the raw text as a JSON string if it was not JSON
    pub body: Value,
    /// Final URL of the request
    pub url: String,
}

impl ExternalResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            url: String::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Failure to obtain any response from the dependency
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalCallError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Port for calling an external dependency
///
/// Implementations must return `Ok` for every HTTP response they receive
/// (including 4xx/5xx) and `Err` only when no response was obtained.
/// Deadlines are the implementation's responsibility.
#[async_trait]
pub trait ExternalCallPort: Send + Sync {
    async fn call(&self, request: ExternalRequest) -> Result<ExternalResponse, ExternalCallError>;
}
