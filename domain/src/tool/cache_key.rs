//! Deterministic cache keys for tool invocations

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// Derive the cache key for `(tool_name, params)`.
///
/// Object keys are emitted in sorted order at every level, so the key does
/// not depend on map iteration order and is stable across restarts.
pub fn cache_key(tool_name: &str, params: &HashMap<String, Value>) -> String {
    let mut key = String::with_capacity(tool_name.len() + 32);
    key.push_str(tool_name);
    key.push(':');

    let mut names: Vec<&String> = params.keys().collect();
    names.sort();

    key.push('{');
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        write_string(&mut key, name);
        key.push(':');
        write_canonical(&mut key, &params[name]);
    }
    key.push('}');
    key
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, k);
                out.push(':');
                write_canonical(out, v);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::String(s) => write_string(out, s),
        scalar => {
            let _ = write!(out, "{}", scalar);
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    // Value's Display produces a properly escaped JSON string literal
    let _ = write!(out, "{}", Value::String(s.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = params(&[("b", json!(1)), ("a", json!({"y": 2, "x": [1, "z"]}))]);
        let b = params(&[("a", json!({"x": [1, "z"], "y": 2})), ("b", json!(1))]);
        assert_eq!(cache_key("tool", &a), cache_key("tool", &b));
    }

    #[test]
    fn test_key_format_is_stable() {
        let p = params(&[("name", json!("retry")), ("limit", json!(5))]);
        assert_eq!(cache_key("get_entry", &p), r#"get_entry:{"limit":5,"name":"retry"}"#);
    }

    #[test]
    fn test_key_distinguishes_tools_and_values() {
        let p = params(&[("name", json!("retry"))]);
        let q = params(&[("name", json!("retries"))]);
        assert_ne!(cache_key("get_entry", &p), cache_key("get_examples", &p));
        assert_ne!(cache_key("get_entry", &p), cache_key("get_entry", &q));
        // A string "5" and a number 5 are different requests
        let s = params(&[("limit", json!("5"))]);
        let n = params(&[("limit", json!(5))]);
        assert_ne!(cache_key("t", &s), cache_key("t", &n));
    }

    #[test]
    fn test_key_escapes_strings() {
        let p = params(&[("q", json!("a\",\"b"))]);
        assert_eq!(cache_key("t", &p), r#"t:{"q":"a\",\"b"}"#);
    }
}
