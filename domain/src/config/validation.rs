//! Configuration validation issues.
//!
//! The configuration loader reports problems as structured
//! [`ConfigIssue`]s instead of failing on the first one, so the binary can
//! print every issue and refuse to start only on [`Severity::Error`].

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A duration, interval or threshold that must be positive is zero.
    ZeroValue { field: String },
    /// A dependency is enabled but has no breaker section; defaults apply.
    MissingBreaker { dependency: String },
    /// A breaker is configured for a dependency nothing calls.
    UnusedBreaker { dependency: String },
    /// A URL field does not look like an http(s) URL.
    InvalidUrl { field: String, value: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_constructors() {
        let err = ConfigIssue::error(
            ConfigIssueCode::ZeroValue {
                field: "cache.cleanup_interval_ms".to_string(),
            },
            "cache.cleanup_interval_ms must be greater than 0",
        );
        assert!(err.is_error());
        assert!(err.to_string().starts_with("error:"));

        let warn = ConfigIssue::warning(
            ConfigIssueCode::MissingBreaker {
                dependency: "remote_docs".to_string(),
            },
            "no breaker configured",
        );
        assert!(!warn.is_error());
        assert!(warn.to_string().starts_with("warning:"));
    }
}
