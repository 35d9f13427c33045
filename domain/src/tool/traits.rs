//! Tool domain traits
//!
//! Contains pure validation logic for invocations. Validation runs on the
//! sanitized parameters; the async handler port lives in the application
//! layer.

use serde_json::Value;

use super::entities::{ParamConstraint, ToolDefinition, ToolInvocation};
use super::value_objects::FieldViolation;

/// Validator for tool invocations
///
/// A pure domain trait: checks an invocation against its definition
/// without any I/O. Returns every violation found, not just the first.
pub trait ToolValidator {
    fn validate(
        &self,
        invocation: &ToolInvocation,
        definition: &ToolDefinition,
    ) -> Result<(), Vec<FieldViolation>>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        invocation: &ToolInvocation,
        definition: &ToolDefinition,
    ) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        for param in &definition.parameters {
            // null is treated the same as an absent field
            let value = match invocation.params.get(&param.name) {
                Some(Value::Null) | None => {
                    if param.required {
                        violations.push(FieldViolation::new(
                            &param.name,
                            "required",
                            format!("Missing required parameter '{}'", param.name),
                        ));
                    }
                    continue;
                }
                Some(value) => value,
            };

            if !param.param_type.accepts(value) {
                violations.push(FieldViolation::new(
                    &param.name,
                    "type",
                    format!("Expected {}, got {}", param.param_type, json_type(value)),
                ));
                continue;
            }

            for constraint in &param.constraints {
                if let Err(message) = check_constraint(constraint, value) {
                    violations.push(FieldViolation::new(&param.name, constraint.name(), message));
                }
            }
        }

        let mut unknown: Vec<&String> = invocation
            .params
            .keys()
            .filter(|k| definition.parameter(k).is_none())
            .collect();
        unknown.sort();
        for name in unknown {
            violations.push(FieldViolation::new(
                name,
                "unknown_field",
                format!("Unknown parameter '{}' for tool '{}'", name, definition.name),
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_constraint(constraint: &ParamConstraint, value: &Value) -> Result<(), String> {
    match constraint {
        ParamConstraint::Pattern { pattern } => match value.as_str() {
            Some(s) if pattern.is_match(s) => Ok(()),
            Some(_) => Err(format!("Must match pattern {}", pattern.as_str())),
            None => Ok(()),
        },
        ParamConstraint::Length { min, max } => match value.as_str() {
            Some(s) => {
                let len = s.chars().count();
                if len < *min || len > *max {
                    Err(format!(
                        "Length must be between {} and {} characters, got {}",
                        min, max, len
                    ))
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        },
        ParamConstraint::Range { min, max } => match value.as_i64() {
            Some(n) if n >= *min && n <= *max => Ok(()),
            _ => Err(format!("Must be between {} and {}", min, max)),
        },
        ParamConstraint::OneOf { values } => match value.as_str() {
            Some(s) if values.iter().any(|v| v == s) => Ok(()),
            _ => Err(format!("Must be one of: {}", values.join(", "))),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{FieldPattern, ToolParameter};
    use serde_json::json;

    fn entry_tool() -> ToolDefinition {
        ToolDefinition::new("get_entry", "Look up an entry")
            .with_parameter(
                ToolParameter::new("name", "Entry slug", true)
                    .with_pattern(FieldPattern::new("^[a-z0-9][a-z0-9-]*$").unwrap())
                    .with_length(1, 16),
            )
            .with_parameter(
                ToolParameter::new("category", "Category", false).with_one_of(["caching", "storage"]),
            )
            .with_parameter(ToolParameter::new("limit", "Max results", false).with_range(1, 10))
    }

    fn violations(call: ToolInvocation) -> Vec<FieldViolation> {
        DefaultToolValidator
            .validate(&call, &entry_tool())
            .unwrap_err()
    }

    #[test]
    fn test_valid_invocation() {
        let call = ToolInvocation::new("get_entry")
            .with_arg("name", "retry")
            .with_arg("category", "caching")
            .with_arg("limit", 3);
        assert!(DefaultToolValidator.validate(&call, &entry_tool()).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let v = violations(ToolInvocation::new("get_entry"));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "name");
        assert_eq!(v[0].constraint, "required");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let v = violations(ToolInvocation::new("get_entry").with_arg("name", Value::Null));
        assert_eq!(v[0].constraint, "required");
    }

    #[test]
    fn test_pattern_and_length_both_reported() {
        let v = violations(
            ToolInvocation::new("get_entry").with_arg("name", "Not A Slug Because Too Long"),
        );
        let constraints: Vec<&str> = v.iter().map(|v| v.constraint.as_str()).collect();
        assert_eq!(constraints, vec!["pattern", "length"]);
    }

    #[test]
    fn test_type_mismatch() {
        let v = violations(ToolInvocation::new("get_entry").with_arg("name", json!(12)));
        assert_eq!(v[0].constraint, "type");
        assert!(v[0].message.contains("number"));
    }

    #[test]
    fn test_enumerated_membership() {
        let v = violations(
            ToolInvocation::new("get_entry")
                .with_arg("name", "retry")
                .with_arg("category", "gardening"),
        );
        assert_eq!(v[0].field, "category");
        assert_eq!(v[0].constraint, "one_of");
    }

    #[test]
    fn test_range() {
        let v = violations(
            ToolInvocation::new("get_entry")
                .with_arg("name", "retry")
                .with_arg("limit", 50),
        );
        assert_eq!(v[0].field, "limit");
        assert_eq!(v[0].constraint, "range");
    }

    #[test]
    fn test_unknown_param() {
        let v = violations(
            ToolInvocation::new("get_entry")
                .with_arg("name", "retry")
                .with_arg("zeta", 1)
                .with_arg("alpha", 1),
        );
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].field, "alpha");
        assert_eq!(v[1].field, "zeta");
        assert!(v.iter().all(|v| v.constraint == "unknown_field"));
    }
}
