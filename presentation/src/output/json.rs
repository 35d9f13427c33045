//! JSON output formatter

use refdesk_domain::resilience::BreakerSnapshot;
use refdesk_domain::tool::{ToolDefinition, ToolResult};
use serde::Serialize;

use super::formatter::OutputFormatter;

/// Pretty-printed JSON; results use the transport envelope
pub struct JsonFormatter;

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &ToolResult) -> String {
        pretty(&result.to_envelope())
    }

    fn format_tools(&self, definitions: &[&ToolDefinition]) -> String {
        pretty(definitions)
    }

    fn format_status(&self, snapshots: &[BreakerSnapshot]) -> String {
        pretty(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdesk_domain::resilience::BreakerState;
    use refdesk_domain::tool::{ToolFailure, ToolParameter};
    use serde_json::Value;

    #[test]
    fn test_failure_uses_envelope() {
        let result = ToolResult::failure(ToolFailure::circuit_open("remote_docs"));
        let value: Value = serde_json::from_str(&JsonFormatter.format_result(&result)).unwrap();
        assert_eq!(value["code"], "CIRCUIT_OPEN");
        assert_eq!(value["details"]["dependency"], "remote_docs");
    }

    #[test]
    fn test_tools_and_status() {
        let def = ToolDefinition::new("get_entry", "Look up")
            .with_parameter(ToolParameter::new("name", "slug", true).with_length(1, 64));
        let value: Value =
            serde_json::from_str(&JsonFormatter.format_tools(&[&def])).unwrap();
        assert_eq!(value[0]["name"], "get_entry");
        assert_eq!(value[0]["parameters"][0]["name"], "name");

        let snapshot = BreakerSnapshot {
            name: "remote_docs".to_string(),
            state: BreakerState::Closed,
            failures: 0,
            failure_threshold: 5,
            open_timeout_ms: 60_000,
            since_last_failure_ms: None,
        };
        let value: Value =
            serde_json::from_str(&JsonFormatter.format_status(&[snapshot])).unwrap();
        assert_eq!(value[0]["state"], "closed");
        assert!(value[0].get("since_last_failure_ms").is_none());
    }
}
