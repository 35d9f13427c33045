//! Console output formatter

use colored::Colorize;
use refdesk_domain::resilience::{BreakerSnapshot, BreakerState};
use refdesk_domain::tool::{ParamConstraint, ToolDefinition, ToolFailure, ToolPayload, ToolResult};
use serde_json::Value;

use super::formatter::OutputFormatter;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn payload(payload: &ToolPayload) -> String {
        let mut output = String::new();
        match payload {
            ToolPayload::Entry(entry) => {
                output.push_str(&format!(
                    "{} {}\n",
                    entry.title.cyan().bold(),
                    format!("({}, {})", entry.name, entry.category).dimmed()
                ));
                output.push_str(&format!("\n{}\n", entry.summary));
                if !entry.examples.is_empty() {
                    output.push_str(&format!("\n{}\n", "Examples:".cyan().bold()));
                    for example in &entry.examples {
                        output.push_str(&format!("  * {}\n", example));
                    }
                }
                if !entry.related.is_empty() {
                    output.push_str(&format!(
                        "\n{} {}\n",
                        "Related:".cyan().bold(),
                        entry.related.join(", ")
                    ));
                }
            }
            ToolPayload::EntryList { category, entries } => {
                let heading = match category {
                    Some(c) => format!("Entries in {}", c),
                    None => "All entries".to_string(),
                };
                output.push_str(&format!("{} ({})\n", heading.cyan().bold(), entries.len()));
                for entry in entries {
                    output.push_str(&format!(
                        "  {:<20} {} {}\n",
                        entry.name.yellow(),
                        entry.title,
                        format!("[{}]", entry.category).dimmed()
                    ));
                }
            }
            ToolPayload::SearchResults { query, matches } => {
                output.push_str(&format!(
                    "{} '{}' ({})\n",
                    "Results for".cyan().bold(),
                    query,
                    matches.len()
                ));
                if matches.is_empty() {
                    output.push_str("  No matches\n");
                }
                for m in matches {
                    output.push_str(&format!(
                        "  {:>4}  {:<20} {}\n",
                        m.score,
                        m.name.yellow(),
                        m.title
                    ));
                }
            }
            ToolPayload::Examples { name, examples } => {
                output.push_str(&format!("{} {}\n", "Examples for".cyan().bold(), name));
                if examples.is_empty() {
                    output.push_str("  (none)\n");
                }
                for example in examples {
                    output.push_str(&format!("  * {}\n", example));
                }
            }
            ToolPayload::RemoteDocument(doc) => {
                output.push_str(&format!("{}\n", doc.title.cyan().bold()));
                if !doc.source_url.is_empty() {
                    output.push_str(&format!("{}\n", doc.source_url.dimmed()));
                }
                output.push_str(&format!("\n{}\n", doc.body));
            }
        }
        output
    }

    fn failure(failure: &ToolFailure) -> String {
        let mut output = format!(
            "{} {}\n",
            format!("Error [{}]:", failure.kind).red().bold(),
            failure.message
        );

        let Some(details) = &failure.details else {
            return output;
        };

        if let Some(violations) = details.get("violations").and_then(Value::as_array) {
            for v in violations {
                output.push_str(&format!(
                    "  - {} ({}): {}\n",
                    v["field"].as_str().unwrap_or("?"),
                    v["constraint"].as_str().unwrap_or("?"),
                    v["message"].as_str().unwrap_or("")
                ));
            }
        }
        for (key, label) in [("suggestions", "Did you mean:"), ("available", "Available tools:")] {
            let names: Vec<&str> = details
                .get(key)
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if !names.is_empty() {
                output.push_str(&format!("  {} {}\n", label.yellow(), names.join(", ")));
            }
        }
        output
    }

    fn constraint(constraint: &ParamConstraint) -> String {
        match constraint {
            ParamConstraint::Pattern { pattern } => format!("matches {}", pattern.as_str()),
            ParamConstraint::Length { min, max } => format!("{}..={} chars", min, max),
            ParamConstraint::Range { min, max } => format!("{}..={}", min, max),
            ParamConstraint::OneOf { values } => format!("one of {}", values.join("|")),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, result: &ToolResult) -> String {
        match result {
            ToolResult::Success(payload) => Self::payload(payload),
            ToolResult::Failure(failure) => Self::failure(failure),
        }
    }

    fn format_tools(&self, definitions: &[&ToolDefinition]) -> String {
        let mut output = String::new();
        for def in definitions {
            output.push_str(&format!("{}", def.name.cyan().bold()));
            if let Some(dep) = &def.dependency {
                output.push_str(&format!(" {}", format!("(via {})", dep).dimmed()));
            }
            output.push_str(&format!("\n  {}\n", def.description));
            for param in &def.parameters {
                let mut notes = vec![param.param_type.as_str().to_string()];
                if param.required {
                    notes.push("required".to_string());
                }
                notes.extend(param.constraints.iter().map(Self::constraint));
                output.push_str(&format!(
                    "    {:<10} {} {}\n",
                    param.name.yellow(),
                    param.description,
                    format!("[{}]", notes.join(", ")).dimmed()
                ));
            }
            output.push('\n');
        }
        output
    }

    fn format_status(&self, snapshots: &[BreakerSnapshot]) -> String {
        if snapshots.is_empty() {
            return "No circuit breakers configured\n".to_string();
        }
        let mut output = String::new();
        for s in snapshots {
            let state = match s.state {
                BreakerState::Closed => s.state.as_str().green(),
                BreakerState::Open => s.state.as_str().red().bold(),
                BreakerState::HalfOpen => s.state.as_str().yellow(),
            };
            output.push_str(&format!(
                "{:<16} {:<10} failures {}/{}, open timeout {} ms",
                s.name, state, s.failures, s.failure_threshold, s.open_timeout_ms
            ));
            if let Some(ms) = s.since_last_failure_ms {
                output.push_str(&format!(", last failure {} ms ago", ms));
            }
            output.push('\n');
        }
        output
    }
}
