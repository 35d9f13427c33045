//! Output formatter trait

use refdesk_domain::resilience::BreakerSnapshot;
use refdesk_domain::tool::{ToolDefinition, ToolResult};

use crate::cli::commands::OutputFormat;

use super::console::ConsoleFormatter;
use super::json::JsonFormatter;

/// Trait for rendering results of one-shot commands
pub trait OutputFormatter {
    /// Format one invocation result
    fn format_result(&self, result: &ToolResult) -> String;

    /// Format the tool listing
    fn format_tools(&self, definitions: &[&ToolDefinition]) -> String;

    /// Format breaker states
    fn format_status(&self, snapshots: &[BreakerSnapshot]) -> String;
}

/// Formatter for the selected output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Pretty => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
