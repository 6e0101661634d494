use serde_json::{Map, Value as JsonValue};

/// Store-side representation of a record.
pub type Document = Map<String, JsonValue>;

/// Reserved primary-key field of a stored document.
pub const PRIMARY_KEY: &str = "_id";

/// Internal pagination key attached to every inserted document.
pub const PAGINATION_KEY: &str = "_ObjectId";

/// A value counts as blank when it is null or a whitespace-only string.
pub fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Current time as epoch milliseconds.
pub fn timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Human-readable JSON type name, used in log messages.
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&JsonValue::Null));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("   ")));
        assert!(!is_blank(&json!("x")));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!([])));
    }

    #[test]
    fn test_timestamp_is_recent() {
        let now = timestamp();
        assert!(now > 1_600_000_000_000);
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(1)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
    }
}
