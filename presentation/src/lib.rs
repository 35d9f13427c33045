//! Presentation layer for refdesk
//!
//! This crate contains the CLI definition, output formatters and the
//! line-delimited JSON transport.

pub mod cli;
pub mod output;
pub mod transport;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::{ConsoleFormatter, JsonFormatter, OutputFormatter, formatter_for};
pub use transport::{ServeSummary, serve_lines};
