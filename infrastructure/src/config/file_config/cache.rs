//! Cache configuration from TOML (`[cache]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw cache configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// TTL applied when a cache write does not specify one
    pub default_ttl_ms: u64,
    /// Period of the background sweep that drops expired entries
    pub cleanup_interval_ms: u64,
}

impl FileCacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: 300_000,
            cleanup_interval_ms: 60_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_section_deserialize() {
        let toml_str = r#"
[cache]
default_ttl_ms = 1500
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cache.default_ttl(), Duration::from_millis(1500));
        // Unset keys keep their defaults
        assert_eq!(config.cache.cleanup_interval(), Duration::from_secs(60));
    }
}
