//! Value rendering for diagnostic messages.

use serde_json::Value;

/// Token used for an absent value.
pub const UNDEFINED: &str = "undefined";

/// Renders a value for inclusion in a human-readable message.
///
/// Absent values render as `undefined`; everything else as compact JSON.
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(Value::String(s)) => quote(s),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(v) => serde_json::to_string(v).unwrap_or_else(|_| "[unserializable]".to_string()),
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_is_undefined_token() {
        assert_eq!(stringify(None), "undefined");
    }

    #[test]
    fn scalars() {
        assert_eq!(stringify(Some(&json!(null))), "null");
        assert_eq!(stringify(Some(&json!(true))), "true");
        assert_eq!(stringify(Some(&json!(42))), "42");
        assert_eq!(stringify(Some(&json!(1.5))), "1.5");
        assert_eq!(stringify(Some(&json!("hi"))), "\"hi\"");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(stringify(Some(&json!("a\"b"))), r#""a\"b""#);
    }

    #[test]
    fn containers_keep_order() {
        assert_eq!(stringify(Some(&json!([1, "x"]))), r#"[1,"x"]"#);
        assert_eq!(
            stringify(Some(&json!({"b": 1, "a": 2}))),
            r#"{"b":1,"a":2}"#
        );
    }
}
