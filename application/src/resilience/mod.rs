//! Resilience services shared by every invocation
//!
//! - [`TtlCache`] memoizes tool results; [`CacheSweeper`] expires them
//!   actively on a cancellable timer.
//! - [`CircuitBreaker`] fails fast for an unhealthy dependency;
//!   [`BreakerRegistry`] holds one per dependency and
//!   [`GuardedDependency`] is the only way handlers reach the outside.
//!
//! Each service is constructed once and injected where it is needed, so
//! tests build isolated instances.

pub mod circuit_breaker;
pub mod guarded;
pub mod registry;
pub mod sweeper;
pub mod ttl_cache;

pub use circuit_breaker::{BreakerError, CircuitBreaker};
pub use guarded::GuardedDependency;
pub use registry::BreakerRegistry;
pub use sweeper::{CacheSweeper, DEFAULT_CLEANUP_INTERVAL};
pub use ttl_cache::{DEFAULT_TTL, TtlCache};
