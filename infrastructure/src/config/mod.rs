//! Configuration file loading for refdesk
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `REFDESK_*` environment variables (`__` separates nesting levels)
//! 2. `--config <path>` specified file
//! 3. Project root: `./refdesk.toml` or `./.refdesk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/refdesk/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBreakerConfig, FileCacheConfig, FileConfig, FileLoggingConfig, FileRemoteConfig,
    REMOTE_DOCS_DEPENDENCY,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
