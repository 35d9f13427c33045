//! Tool domain value objects: the outcome side of an invocation
//!
//! Every invocation terminates in a [`ToolResult`]: either a
//! [`ToolPayload`] or a [`ToolFailure`] tagged with an [`ErrorKind`].
//!
//! | Kind | Cached? | Meaning |
//! |------|:---:|---------|
//! | `VALIDATION_ERROR` | handler-raised only | Malformed or out-of-policy input |
//! | `UNKNOWN_TOOL` | No | No handler registered for the name |
//! | `NOT_FOUND` | Yes (short TTL) | Entity could not be resolved |
//! | `CIRCUIT_OPEN` | No | Dependency assumed unhealthy, call not attempted |
//! | `DEPENDENCY_ERROR` | No | The external call itself failed |
//! | `INTERNAL_ERROR` | No | Unexpected handler failure |

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::payload::ToolPayload;

/// Classification of a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationError,
    UnknownTool,
    NotFound,
    CircuitOpen,
    DependencyError,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::UnknownTool => "UNKNOWN_TOOL",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::CircuitOpen => "CIRCUIT_OPEN",
            ErrorKind::DependencyError => "DEPENDENCY_ERROR",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether a failure of this kind is a stable outcome worth memoizing.
    ///
    /// Transient kinds must not be cached: a cached `CIRCUIT_OPEN` would
    /// outlive the breaker's recovery.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, ErrorKind::NotFound | ErrorKind::ValidationError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One violated constraint on one request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Parameter name
    pub field: String,
    /// Constraint identifier (e.g., "required", "pattern", "length")
    pub constraint: String,
    /// Human-readable explanation
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.constraint, self.message)
    }
}

/// Structured failure returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn unknown_tool(name: &str, available: &[&str]) -> Self {
        Self::new(ErrorKind::UnknownTool, format!("Unknown tool: {}", name))
            .with_details(json!({ "available": available }))
    }

    /// Validation failure carrying every violation as `details`
    pub fn validation(violations: &[FieldViolation]) -> Self {
        let message = match violations {
            [only] => format!("Invalid parameter {}", only),
            _ => format!("{} invalid parameters", violations.len()),
        };
        Self::new(ErrorKind::ValidationError, message)
            .with_details(json!({ "violations": violations }))
    }

    pub fn not_found(message: impl Into<String>, suggestions: &[String]) -> Self {
        Self::new(ErrorKind::NotFound, message).with_details(json!({ "suggestions": suggestions }))
    }

    pub fn circuit_open(dependency: &str) -> Self {
        Self::new(
            ErrorKind::CircuitOpen,
            format!("Dependency '{}' is unavailable, try again later", dependency),
        )
        .with_details(json!({ "dependency": dependency }))
    }

    pub fn dependency(dependency: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DependencyError, message)
            .with_details(json!({ "dependency": dependency }))
    }

    /// Generic internal failure. Never carries the underlying error text.
    pub fn internal() -> Self {
        Self::new(
            ErrorKind::InternalError,
            "Internal error while handling the request",
        )
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of a tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(ToolPayload),
    Failure(ToolFailure),
}

impl ToolResult {
    pub fn success(payload: ToolPayload) -> Self {
        ToolResult::Success(payload)
    }

    pub fn failure(failure: ToolFailure) -> Self {
        ToolResult::Failure(failure)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success(_))
    }

    pub fn payload(&self) -> Option<&ToolPayload> {
        match self {
            ToolResult::Success(payload) => Some(payload),
            ToolResult::Failure(_) => None,
        }
    }

    pub fn failure_ref(&self) -> Option<&ToolFailure> {
        match self {
            ToolResult::Success(_) => None,
            ToolResult::Failure(failure) => Some(failure),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure_ref().map(|f| f.kind)
    }

    /// Short outcome label for logs ("success" or the error kind)
    pub fn outcome(&self) -> &str {
        match self {
            ToolResult::Success(_) => "success",
            ToolResult::Failure(failure) => failure.kind.as_str(),
        }
    }

    /// Transport envelope: the payload itself, or `{ error, code, details? }`
    pub fn to_envelope(&self) -> Value {
        match self {
            ToolResult::Success(payload) => serde_json::to_value(payload).unwrap_or_else(|e| {
                json!({ "error": format!("Failed to encode result: {}", e), "code": ErrorKind::InternalError })
            }),
            ToolResult::Failure(failure) => {
                let mut envelope = json!({
                    "error": failure.message,
                    "code": failure.kind,
                });
                if let Some(details) = &failure.details {
                    envelope["details"] = details.clone();
                }
                envelope
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cacheable_kinds() {
        assert!(ErrorKind::NotFound.is_cacheable());
        assert!(ErrorKind::ValidationError.is_cacheable());
        assert!(!ErrorKind::CircuitOpen.is_cacheable());
        assert!(!ErrorKind::DependencyError.is_cacheable());
        assert!(!ErrorKind::InternalError.is_cacheable());
        assert!(!ErrorKind::UnknownTool.is_cacheable());
    }

    #[test]
    fn test_validation_failure_details() {
        let failure = ToolFailure::validation(&[FieldViolation::new(
            "name",
            "pattern",
            "must match ^[a-z]+$",
        )]);

        assert_eq!(failure.kind, ErrorKind::ValidationError);
        assert!(failure.message.contains("name"));
        let details = failure.details.unwrap();
        assert_eq!(details["violations"][0]["field"], "name");
        assert_eq!(details["violations"][0]["constraint"], "pattern");
    }

    #[test]
    fn test_failure_envelope() {
        let result = ToolResult::failure(ToolFailure::not_found(
            "No entry named 'circut-breaker'",
            &["circuit-breaker".to_string()],
        ));
        let envelope = result.to_envelope();

        assert_eq!(envelope["code"], "NOT_FOUND");
        assert!(envelope["error"].as_str().unwrap().contains("circut-breaker"));
        assert_eq!(envelope["details"]["suggestions"][0], "circuit-breaker");
    }

    #[test]
    fn test_internal_failure_is_generic() {
        let failure = ToolFailure::internal();
        assert_eq!(failure.kind, ErrorKind::InternalError);
        assert!(failure.details.is_none());
        assert_eq!(ToolResult::failure(failure).outcome(), "INTERNAL_ERROR");
    }
}
