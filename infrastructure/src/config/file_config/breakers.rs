//! Circuit breaker configuration from TOML (`[breakers.<dependency>]` tables)

use refdesk_domain::resilience::BreakerPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw breaker thresholds for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Milliseconds the circuit stays open before a trial call
    pub open_timeout_ms: u64,
}

impl FileBreakerConfig {
    pub fn to_policy(&self) -> BreakerPolicy {
        BreakerPolicy::new(
            self.failure_threshold,
            Duration::from_millis(self.open_timeout_ms),
        )
    }
}

impl Default for FileBreakerConfig {
    fn default() -> Self {
        let policy = BreakerPolicy::default();
        Self {
            failure_threshold: policy.failure_threshold,
            open_timeout_ms: policy.open_timeout.as_millis() as u64,
        }
    }
}
