//! Tool domain entities

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// JSON type a parameter must have after sanitization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }

    /// Whether `value` has this JSON type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiled regular expression used as a name pattern constraint.
///
/// Serializes as its source string so tool definitions can be listed.
#[derive(Debug, Clone)]
pub struct FieldPattern(Regex);

impl FieldPattern {
    /// Compile a pattern. Fails on invalid regex syntax.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Serialize for FieldPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A per-field rule checked after sanitization
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum ParamConstraint {
    /// String must match the pattern
    Pattern { pattern: FieldPattern },
    /// String length in characters, inclusive bounds
    Length { min: usize, max: usize },
    /// Integer value, inclusive bounds
    Range { min: i64, max: i64 },
    /// String must be one of the listed values
    OneOf { values: Vec<String> },
}

impl ParamConstraint {
    /// Identifier reported in validation failures
    pub fn name(&self) -> &'static str {
        match self {
            ParamConstraint::Pattern { .. } => "pattern",
            ParamConstraint::Length { .. } => "length",
            ParamConstraint::Range { .. } => "range",
            ParamConstraint::OneOf { .. } => "one_of",
        }
    }
}

/// How long results of a tool stay cached.
///
/// Successful lookups live for `success_ttl`; cacheable failures
/// (not found, handler-side validation) live for the shorter `failure_ttl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub success_ttl: Duration,
    pub failure_ttl: Duration,
}

impl CachePolicy {
    pub fn new(success_ttl: Duration, failure_ttl: Duration) -> Self {
        Self {
            success_ttl,
            failure_ttl,
        }
    }

    /// Policy with the given success TTL and the default failure TTL
    pub fn success_for(success_ttl: Duration) -> Self {
        Self {
            success_ttl,
            ..Self::default()
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            success_ttl: Duration::from_secs(10 * 60),
            failure_ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// Definition of a tool the dispatcher can route to
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_entry")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
    /// Name of the external dependency the tool calls, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    #[serde(skip)]
    pub cache_policy: CachePolicy,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub param_type: ParamType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ParamConstraint>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            dependency: None,
            cache_policy: CachePolicy::default(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
            constraints: Vec::new(),
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_constraint(mut self, constraint: ParamConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_pattern(self, pattern: FieldPattern) -> Self {
        self.with_constraint(ParamConstraint::Pattern { pattern })
    }

    pub fn with_length(self, min: usize, max: usize) -> Self {
        self.with_constraint(ParamConstraint::Length { min, max })
    }

    pub fn with_range(self, min: i64, max: i64) -> Self {
        self.with_type(ParamType::Integer)
            .with_constraint(ParamConstraint::Range { min, max })
    }

    pub fn with_one_of<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_constraint(ParamConstraint::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        })
    }
}

/// A request to run a named tool with raw parameters
#[derive(Debug, Clone, Default)]
pub struct ToolInvocation {
    pub name: String,
    pub params: HashMap<String, Value>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_params(name: impl Into<String>, params: HashMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a string parameter
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string parameter or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required parameter: {}", key))
    }

    /// Get an optional i64 parameter
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.params.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional bool parameter
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("get_entry", "Look up an entry")
            .with_parameter(ToolParameter::new("name", "Entry slug", true).with_length(1, 64))
            .with_dependency("remote_docs");

        assert_eq!(tool.name, "get_entry");
        assert_eq!(tool.parameters.len(), 1);
        assert!(tool.parameter("name").is_some());
        assert!(tool.parameter("missing").is_none());
        assert_eq!(tool.dependency.as_deref(), Some("remote_docs"));
        assert_eq!(tool.cache_policy, CachePolicy::default());
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::String.accepts(&json!("x")));
        assert!(!ParamType::String.accepts(&json!(1)));
        assert!(ParamType::Integer.accepts(&json!(3)));
        assert!(!ParamType::Integer.accepts(&json!(3.5)));
        assert!(ParamType::Boolean.accepts(&json!(false)));
    }

    #[test]
    fn test_definition_serializes_pattern_as_string() {
        let tool = ToolDefinition::new("t", "d").with_parameter(
            ToolParameter::new("name", "n", true)
                .with_pattern(FieldPattern::new("^[a-z]+$").unwrap()),
        );
        let value = serde_json::to_value(&tool).unwrap();
        let constraint = &value["parameters"][0]["constraints"][0];
        assert_eq!(constraint["constraint"], "pattern");
        assert_eq!(constraint["pattern"], "^[a-z]+$");
        assert!(value.get("cache_policy").is_none());
    }

    #[test]
    fn test_invocation_accessors() {
        let call = ToolInvocation::new("search_entries")
            .with_arg("query", "cache")
            .with_arg("limit", 5);

        assert_eq!(call.get_string("query"), Some("cache"));
        assert_eq!(call.get_i64("limit"), Some(5));
        assert!(call.require_string("missing").is_err());
        assert_eq!(call.get_bool("query"), None);
    }
}
