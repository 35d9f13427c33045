//! Remote docs configuration from TOML (`[remote]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the breaker guarding the remote docs API
pub const REMOTE_DOCS_DEPENDENCY: &str = "remote_docs";

/// Raw remote docs configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRemoteConfig {
    /// Register the `fetch_remote_doc` tool
    pub enabled: bool,
    /// Documents are fetched from `{base_url}/{name}`
    pub base_url: String,
    /// Per-request timeout of the HTTP client
    pub timeout_ms: u64,
}

impl FileRemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_valid_url(&self) -> bool {
        let url = self.base_url.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        matches!(rest, Some(host) if !host.is_empty())
    }
}

impl Default for FileRemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://docs.example.org/api/entries".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_check() {
        let mut remote = FileRemoteConfig::default();
        assert!(remote.has_valid_url());

        remote.base_url = "ftp://docs".to_string();
        assert!(!remote.has_valid_url());

        remote.base_url = "http://".to_string();
        assert!(!remote.has_valid_url());
    }
}
