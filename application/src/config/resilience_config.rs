//! Runtime settings of the resilience layer.

use std::collections::HashMap;
use std::time::Duration;

use refdesk_domain::resilience::BreakerPolicy;

use crate::resilience::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL};

/// Cache and breaker settings, resolved from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResilienceConfig {
    /// TTL used when a cache write does not specify one
    pub default_ttl: Duration,
    /// Period of the active cache sweep
    pub cleanup_interval: Duration,
    /// Breaker thresholds keyed by dependency name
    pub breakers: HashMap<String, BreakerPolicy>,
}

impl ResilienceConfig {
    pub fn with_breaker(mut self, dependency: impl Into<String>, policy: BreakerPolicy) -> Self {
        self.breakers.insert(dependency.into(), policy);
        self
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            breakers: HashMap::new(),
        }
    }
}
