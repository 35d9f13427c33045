//! Input normalization applied before validation

use serde_json::Value;
use std::collections::HashMap;

/// Recursively trim every string in `value`.
///
/// Arrays are mapped element-wise and objects key-by-key (keys are kept
/// as they are). Numbers, booleans and `null` pass through unchanged.
/// Idempotent: `sanitize(sanitize(v)) == sanitize(v)`.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Value::String(s)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, sanitize(v))).collect()),
        other => other,
    }
}

/// Sanitize every value of a parameter map
pub fn sanitize_params(params: HashMap<String, Value>) -> HashMap<String, Value> {
    params.into_iter().map(|(k, v)| (k, sanitize(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_is_recursive() {
        let raw = json!({
            "name": " hi ",
            "tags": [" a ", "b "],
            "nested": { "x": " y " }
        });
        let expected = json!({
            "name": "hi",
            "tags": ["a", "b"],
            "nested": { "x": "y" }
        });
        assert_eq!(sanitize(raw), expected);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let raw = json!({
            "name": "\t spaced\n",
            "items": [{ "k": "  v" }, 3, null, true],
        });
        let once = sanitize(raw);
        let twice = sanitize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sanitize_leaves_scalars_and_keys() {
        assert_eq!(sanitize(json!(42)), json!(42));
        assert_eq!(sanitize(json!(null)), json!(null));
        assert_eq!(sanitize(json!(false)), json!(false));
        assert_eq!(sanitize(json!({ " key ": " v " })), json!({ " key ": "v" }));
    }

    #[test]
    fn test_sanitize_params() {
        let mut params = HashMap::new();
        params.insert("query".to_string(), json!("  retry  "));
        let clean = sanitize_params(params);
        assert_eq!(clean["query"], json!("retry"));
    }
}
