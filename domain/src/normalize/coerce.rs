//! Field coercion for untrusted JSON records.
//!
//! Every field read from a model response goes through one of these helpers.
//! Each takes `Option<&Value>` (the result of `value.get(key)`) so a missing
//! key, a `null`, and a wrongly-typed value all take the same default path.

use crate::reasoning::level::Confidence;
use serde_json::Value;

/// Non-blank text, or `default`.
///
/// Numbers and booleans are stringified; objects and arrays are rejected.
pub fn text_or(value: Option<&Value>, default: &str) -> String {
    optional_text(value).unwrap_or_else(|| default.to_string())
}

/// Non-blank text if present.
pub fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// List of strings, or `default`.
///
/// A bare string is lifted into a one-element list. Non-text items inside
/// an array are dropped. An explicitly empty array stays empty.
pub fn string_list_or(value: Option<&Value>, default: &[&str]) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| optional_text(Some(item)))
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

/// First run of ASCII digits in `text`, parsed as an integer.
pub fn first_integer(text: &str) -> Option<i64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Integer from a number (floats truncate) or from text containing one.
pub fn integer_from_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => first_integer(s),
        _ => None,
    }
}

/// Real number from a number or a numeric string.
pub fn number_from_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Boolean from a bool, a yes/no style string, or a number.
pub fn bool_from_value(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

/// Agent id from an integer or a string that contains one (`"agent_2"`).
pub fn agent_id_from_value(value: Option<&Value>) -> Option<u32> {
    let id = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => u64::try_from(first_integer(s)?).ok()?,
        _ => return None,
    };
    u32::try_from(id).ok()
}

/// Confidence from a label or a probability.
///
/// | Input | Result |
/// |-------|--------|
/// | text containing `high` | `High` |
/// | text containing `low` | `Low` |
/// | number `>= 0.8` | `High` |
/// | number `<= 0.4` | `Low` |
/// | anything else | `Medium` |
pub fn confidence_from_value(value: Option<&Value>) -> Confidence {
    match value {
        Some(Value::String(s)) => Confidence::from_label(s),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(p) if p >= 0.8 => Confidence::High,
            Some(p) if p <= 0.4 => Confidence::Low,
            _ => Confidence::Medium,
        },
        _ => Confidence::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_or() {
        let v = json!({"a": "hello", "b": "  ", "c": 3, "d": {"x": 1}});
        assert_eq!(text_or(v.get("a"), "dflt"), "hello");
        assert_eq!(text_or(v.get("b"), "dflt"), "dflt");
        assert_eq!(text_or(v.get("c"), "dflt"), "3");
        assert_eq!(text_or(v.get("d"), "dflt"), "dflt");
        assert_eq!(text_or(v.get("missing"), "dflt"), "dflt");
    }

    #[test]
    fn test_string_list_or() {
        let v = json!({"list": ["a", 2, null, ""], "single": "one", "empty": [], "num": 5});
        assert_eq!(string_list_or(v.get("list"), &["d"]), vec!["a", "2"]);
        assert_eq!(string_list_or(v.get("single"), &["d"]), vec!["one"]);
        assert!(string_list_or(v.get("empty"), &["d"]).is_empty());
        assert_eq!(string_list_or(v.get("num"), &["d"]), vec!["d"]);
        assert_eq!(string_list_or(None, &["x", "y"]), vec!["x", "y"]);
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("about 12 steps, maybe 14"), Some(12));
        assert_eq!(first_integer("7"), Some(7));
        assert_eq!(first_integer("none"), None);
    }

    #[test]
    fn test_integer_from_value() {
        assert_eq!(integer_from_value(Some(&json!(9))), Some(9));
        assert_eq!(integer_from_value(Some(&json!(9.7))), Some(9));
        assert_eq!(integer_from_value(Some(&json!("roughly 11"))), Some(11));
        assert_eq!(integer_from_value(Some(&json!(true))), None);
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(Some(&json!(8.5))), Some(8.5));
        assert_eq!(number_from_value(Some(&json!(" 6 "))), Some(6.0));
        assert_eq!(number_from_value(Some(&json!("high"))), None);
        assert_eq!(number_from_value(Some(&json!("NaN"))), None);
    }

    #[test]
    fn test_bool_from_value() {
        assert_eq!(bool_from_value(Some(&json!(true))), Some(true));
        assert_eq!(bool_from_value(Some(&json!("Yes"))), Some(true));
        assert_eq!(bool_from_value(Some(&json!("false"))), Some(false));
        assert_eq!(bool_from_value(Some(&json!(0))), Some(false));
        assert_eq!(bool_from_value(Some(&json!("maybe"))), None);
    }

    #[test]
    fn test_agent_id_from_value() {
        assert_eq!(agent_id_from_value(Some(&json!(3))), Some(3));
        assert_eq!(agent_id_from_value(Some(&json!("agent_4"))), Some(4));
        assert_eq!(agent_id_from_value(Some(&json!(-1))), None);
        assert_eq!(agent_id_from_value(Some(&json!(null))), None);
    }

    #[test]
    fn test_confidence_from_value() {
        assert_eq!(confidence_from_value(Some(&json!("Very HIGH"))), Confidence::High);
        assert_eq!(confidence_from_value(Some(&json!("low-ish"))), Confidence::Low);
        assert_eq!(confidence_from_value(Some(&json!("unsure"))), Confidence::Medium);
        assert_eq!(confidence_from_value(Some(&json!(0.9))), Confidence::High);
        assert_eq!(confidence_from_value(Some(&json!(0.8))), Confidence::High);
        assert_eq!(confidence_from_value(Some(&json!(0.4))), Confidence::Low);
        assert_eq!(confidence_from_value(Some(&json!(0.6))), Confidence::Medium);
        assert_eq!(confidence_from_value(None), Confidence::Medium);
    }
}
