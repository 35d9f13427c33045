//! Circuit breaker value objects
//!
//! The breaker itself (with its lock and clock) lives in the application
//! layer; these are the states and settings it works with.
//!
//! ```text
//!            failures >= threshold
//!   Closed ─────────────────────────▶ Open
//!     ▲                               │  open_timeout elapsed,
//!     │ trial succeeds                │  next call attempts
//!     │                               ▼
//!     └──────────────────────────── HalfOpen
//!                                     │ trial fails
//!                                     └──────▶ Open (window restarts)
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gate state of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed thresholds of one breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerPolicy {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// How long the circuit stays open before one trial call is let through
    pub open_timeout: Duration,
}

impl BreakerPolicy {
    pub fn new(failure_threshold: u32, open_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            open_timeout,
        }
    }
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout: Duration::from_secs(60),
        }
    }
}

/// Point-in-time view of a breaker, for status output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: BreakerState,
    pub failures: u32,
    pub failure_threshold: u32,
    pub open_timeout_ms: u64,
    /// Milliseconds since the last recorded failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_last_failure_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(BreakerState::HalfOpen.to_string(), "half_open");
        assert_eq!(
            serde_json::to_value(BreakerState::Open).unwrap(),
            serde_json::json!("open")
        );
    }

    #[test]
    fn test_default_policy() {
        let policy = BreakerPolicy::default();
        assert_eq!(policy.failure_threshold, 5);
        assert_eq!(policy.open_timeout, Duration::from_secs(60));
    }
}
