//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application config
//! once validated.

mod breakers;
mod cache;
mod logging;
mod remote;

pub use breakers::FileBreakerConfig;
pub use cache::FileCacheConfig;
pub use logging::FileLoggingConfig;
pub use remote::{FileRemoteConfig, REMOTE_DOCS_DEPENDENCY};

use refdesk_application::config::ResilienceConfig;
use refdesk_domain::config::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Result cache settings
    pub cache: FileCacheConfig,
    /// Breaker thresholds keyed by dependency name
    pub breakers: BTreeMap<String, FileBreakerConfig>,
    /// Remote docs API
    pub remote: FileRemoteConfig,
    /// Structured invocation log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks, in order:
    /// 1. Zero durations and thresholds (errors)
    /// 2. Remote docs URL and breaker wiring
    /// 3. Breakers configured for dependencies nothing calls (warnings)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Zero values
        let mut zero_fields: Vec<(String, u64)> = vec![
            ("cache.default_ttl_ms".to_string(), self.cache.default_ttl_ms),
            (
                "cache.cleanup_interval_ms".to_string(),
                self.cache.cleanup_interval_ms,
            ),
        ];
        for (name, breaker) in &self.breakers {
            zero_fields.push((
                format!("breakers.{}.failure_threshold", name),
                u64::from(breaker.failure_threshold),
            ));
            zero_fields.push((
                format!("breakers.{}.open_timeout_ms", name),
                breaker.open_timeout_ms,
            ));
        }
        if self.remote.enabled {
            zero_fields.push(("remote.timeout_ms".to_string(), self.remote.timeout_ms));
        }
        for (field, value) in zero_fields {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: field.clone(),
                    },
                    format!("{} must be greater than 0", field),
                ));
            }
        }

        // 2. Remote docs wiring
        if self.remote.enabled {
            if !self.remote.has_valid_url() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidUrl {
                        field: "remote.base_url".to_string(),
                        value: self.remote.base_url.clone(),
                    },
                    format!(
                        "remote.base_url: '{}' is not an http(s) URL",
                        self.remote.base_url
                    ),
                ));
            }
            if !self.breakers.contains_key(REMOTE_DOCS_DEPENDENCY) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::MissingBreaker {
                        dependency: REMOTE_DOCS_DEPENDENCY.to_string(),
                    },
                    format!(
                        "[remote] is enabled but [breakers.{}] is not configured, using defaults",
                        REMOTE_DOCS_DEPENDENCY
                    ),
                ));
            }
        }

        // 3. Unused breakers
        for name in self.breakers.keys() {
            if name != REMOTE_DOCS_DEPENDENCY {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnusedBreaker {
                        dependency: name.clone(),
                    },
                    format!("[breakers.{}] does not match any known dependency", name),
                ));
            }
        }

        issues
    }

    /// Convert to the runtime settings of the resilience layer
    pub fn to_resilience_config(&self) -> ResilienceConfig {
        self.breakers.iter().fold(
            ResilienceConfig {
                default_ttl: self.cache.default_ttl(),
                cleanup_interval: self.cache.cleanup_interval(),
                ..ResilienceConfig::default()
            },
            |config, (name, breaker)| config.with_breaker(name.clone(), breaker.to_policy()),
        )
    }
}
