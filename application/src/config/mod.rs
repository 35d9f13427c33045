//! Application-level configuration.
//!
//! - [`ResilienceConfig`]: cache TTL, sweep period and per-dependency
//!   breaker policies

pub mod resilience_config;

pub use resilience_config::ResilienceConfig;
