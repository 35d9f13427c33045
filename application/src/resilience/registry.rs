//! Named circuit breakers, one per external dependency.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use refdesk_domain::resilience::{BreakerPolicy, BreakerSnapshot};

use super::circuit_breaker::CircuitBreaker;

/// Owns every breaker of the process.
///
/// Built once at startup from configuration. Handlers get an `Arc` to the
/// breaker of the dependency they call.
#[derive(Debug, Default)]
pub struct BreakerRegistry {
    breakers: HashMap<String, Arc<CircuitBreaker>>,
    default_policy: BreakerPolicy,
}

impl BreakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with one breaker per configured dependency
    pub fn from_policies(policies: impl IntoIterator<Item = (String, BreakerPolicy)>) -> Self {
        let breakers = policies
            .into_iter()
            .map(|(name, policy)| {
                let breaker = Arc::new(CircuitBreaker::new(name.clone(), policy));
                (name, breaker)
            })
            .collect();
        Self {
            breakers,
            default_policy: BreakerPolicy::default(),
        }
    }

    /// Policy used for dependencies that were not configured
    pub fn with_default_policy(mut self, policy: BreakerPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Breaker for `dependency`, created with the default policy if missing
    pub fn breaker(&mut self, dependency: &str) -> Arc<CircuitBreaker> {
        let default_policy = self.default_policy;
        let breaker = self
            .breakers
            .entry(dependency.to_string())
            .or_insert_with(|| {
                debug!(dependency, "No breaker configured, using default policy");
                Arc::new(CircuitBreaker::new(dependency, default_policy))
            });
        Arc::clone(breaker)
    }

    pub fn get(&self, dependency: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(dependency).cloned()
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }

    /// Snapshots of every breaker, sorted by name
    pub fn snapshots(&self) -> Vec<BreakerSnapshot> {
        let mut snapshots: Vec<BreakerSnapshot> =
            self.breakers.values().map(|b| b.snapshot()).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_configured_policies_are_used() {
        let registry = BreakerRegistry::from_policies([(
            "remote_docs".to_string(),
            BreakerPolicy::new(2, Duration::from_secs(5)),
        )]);

        let breaker = registry.get("remote_docs").unwrap();
        assert_eq!(breaker.policy().failure_threshold, 2);
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_breaker_is_shared() {
        let mut registry = BreakerRegistry::new();
        let a = registry.breaker("remote_docs");
        let b = registry.breaker("remote_docs");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.policy(), BreakerPolicy::default());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshots_sorted() {
        let mut registry = BreakerRegistry::new();
        registry.breaker("zeta");
        registry.breaker("alpha");
        let names: Vec<String> = registry.snapshots().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
