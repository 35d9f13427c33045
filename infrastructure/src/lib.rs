//! Infrastructure layer for refdesk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, the JSONL
//! invocation log, the HTTP client for the remote docs API, the static
//! catalog and the concrete tool handlers.

pub mod catalog;
pub mod config;
#[cfg(feature = "remote")]
pub mod http;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use catalog::{CatalogError, StaticCatalog};
pub use config::{ConfigError, ConfigLoader, FileConfig, REMOTE_DOCS_DEPENDENCY};
#[cfg(feature = "remote")]
pub use http::HttpExternalCall;
pub use logging::JsonlInvocationLogger;
pub use tools::{FetchRemoteDocHandler, catalog_handlers};
