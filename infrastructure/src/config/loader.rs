//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use refdesk_domain::config::ConfigIssue;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment overrides, e.g. `REFDESK_CACHE__DEFAULT_TTL_MS`
pub const ENV_PREFIX: &str = "REFDESK_";

const PROJECT_CONFIG_FILES: [&str; 2] = ["refdesk.toml", ".refdesk.toml"];

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration ({} error(s))", .0.len())]
    Invalid(Vec<ConfigIssue>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `REFDESK_*`, nested with `__`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./refdesk.toml` or `./.refdesk.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/refdesk/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract().map_err(Box::new)?)
    }

    /// Load defaults merged with a single file, ignoring discovery and env
    pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let config = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Validate, splitting issues into a hard failure or a list of warnings
    pub fn check(config: &FileConfig) -> Result<Vec<ConfigIssue>, ConfigError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            config.validate().into_iter().partition(|i| i.is_error());
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/refdesk/config.toml if set,
    /// otherwise falls back to ~/.config/refdesk/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("refdesk").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:     {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./refdesk.toml or ./.refdesk.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
