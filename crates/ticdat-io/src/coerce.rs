//! Conversion of raw file values into model values.
//!
//! Files cannot always say what a value is: JSON has no infinity and CSV has
//! no types at all. The field's type constraint, when declared, settles it.

use ticdat_model::{TypeConstraint, Value, to_datetime};

/// The infinities, as written for non-finite numbers.
fn infinity(text: &str) -> Option<f64> {
    match text {
        "inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// Interpret text as a number when the field wants one.
fn text_value(text: &str, constraint: Option<&TypeConstraint>, numeric_looking: bool) -> Value {
    let value = Value::text(text);
    let Some(constraint) = constraint else {
        if let Some(number) = infinity(text) {
            return Value::Number(number);
        }
        return match text.trim().parse::<f64>() {
            Ok(number) if numeric_looking => Value::Number(number),
            _ => value,
        };
    };
    if constraint.datetime {
        return to_datetime(&value).map_or(value, Value::DateTime);
    }
    if constraint.valid(&value) || !constraint.number_allowed() {
        return value;
    }
    text.trim().parse::<f64>().map_or(value, Value::Number)
}

/// Convert a JSON cell. Without a constraint only `"inf"` and `"-inf"`
/// become numbers.
pub fn from_json(json: &serde_json::Value, constraint: Option<&TypeConstraint>) -> Option<Value> {
    match json {
        serde_json::Value::Null => Some(Value::Null),
        serde_json::Value::Bool(flag) => Some(Value::Bool(*flag)),
        serde_json::Value::Number(number) => number.as_f64().map(Value::Number),
        serde_json::Value::String(text) => Some(text_value(text, constraint, false)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

/// Convert a CSV cell. Empty cells are null.
pub fn from_csv(cell: &str, constraint: Option<&TypeConstraint>) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    text_value(cell, constraint, true)
}

/// Render a value as a CSV cell.
pub fn to_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn non_negative() -> TypeConstraint {
        TypeConstraint::builder()
            .inclusive_max(true)
            .build()
            .expect("constraint")
    }

    #[test]
    fn json_strings_become_numbers_only_when_needed() {
        let constraint = non_negative();
        assert_eq!(
            from_json(&json!("inf"), Some(&constraint)),
            Some(Value::from(f64::INFINITY))
        );
        assert_eq!(from_json(&json!("inf"), None), Some(Value::from(f64::INFINITY)));
        assert_eq!(from_json(&json!("12"), None), Some(Value::text("12")));
        assert_eq!(from_json(&json!(" inf"), None), Some(Value::text(" inf")));
        assert_eq!(
            from_json(&json!("12"), Some(&TypeConstraint::any_string())),
            Some(Value::text("12"))
        );
        assert_eq!(from_json(&json!([1]), None), None);
    }

    #[test]
    fn csv_cells() {
        assert_eq!(from_csv("", None), Value::Null);
        assert_eq!(from_csv("2.5", None), Value::from(2.5));
        assert_eq!(from_csv("pizza", None), Value::text("pizza"));
        assert_eq!(from_csv("0012", None), Value::from(12.0));
        assert_eq!(from_csv("true", None), Value::text("true"));
        assert_eq!(from_csv("-inf", None), Value::from(f64::NEG_INFINITY));
        let strings = TypeConstraint::builder()
            .any_string()
            .build()
            .expect("constraint");
        // accepted as text, so it stays text
        assert_eq!(from_csv("7", Some(&TypeConstraint::any_string())), Value::text("7"));
        assert_eq!(from_csv("7", Some(&strings)), Value::text("7"));
        assert_eq!(from_csv("-inf", Some(&non_negative())), Value::from(f64::NEG_INFINITY));
    }

    #[test]
    fn datetime_fields_parse_text() {
        let constraint = TypeConstraint::datetime(false);
        assert!(matches!(
            from_csv("2024-03-01 10:00:00", Some(&constraint)),
            Value::DateTime(_)
        ));
        assert_eq!(from_csv("soon", Some(&constraint)), Value::text("soon"));
    }

    #[test]
    fn csv_rendering() {
        assert_eq!(to_csv(&Value::Null), "");
        assert_eq!(to_csv(&Value::from(10.0)), "10");
        assert_eq!(to_csv(&Value::from(f64::INFINITY)), "inf");
    }
}
