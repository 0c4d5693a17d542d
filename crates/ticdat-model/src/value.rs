//! Cell values and primary keys.
//!
//! A [`Value`] is classified once, when data crosses into the model, and is
//! never re-inspected to guess its kind afterwards. Values are totally ordered
//! and hashable so they can serve as primary-key components.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Format used when a datetime value is rendered as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    /// Booleans are kept distinct from numbers and never satisfy a numeric constraint.
    Bool(bool),
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// String view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Whether the value may be used as an explicit default.
    pub fn is_acceptable_default(&self) -> bool {
        matches!(self, Value::Null | Value::Number(_) | Value::Text(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Text(_) => 3,
            Value::DateTime(_) => 4,
        }
    }
}

/// Bit pattern used for equality and hashing: all zeros and all NaNs collapse.
fn canonical_bits(number: f64) -> u64 {
    if number == 0.0 {
        0
    } else if number.is_nan() {
        f64::NAN.to_bits()
    } else {
        number.to_bits()
    }
}

/// Total order on numbers that agrees with `canonical_bits`: every NaN ranks
/// above `+inf` and the two zeros are equal.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(flag) => flag.hash(state),
            Value::Number(number) => canonical_bits(*number).hash(state),
            Value::Text(text) => text.hash(state),
            Value::DateTime(datetime) => datetime.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Number(number) => write!(f, "{number}"),
            Value::Text(text) => write!(f, "{text}"),
            Value::DateTime(datetime) => write!(f, "{}", datetime.format(DATETIME_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            // JSON has no representation for non-finite numbers
            Value::Number(number) if number.is_finite() => serializer.serialize_f64(*number),
            Value::Number(number) => serializer.collect_str(number),
            Value::Text(text) => serializer.serialize_str(text),
            Value::DateTime(datetime) => {
                serializer.collect_str(&datetime.format(DATETIME_FORMAT))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Primary key of a row: one value per primary-key field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Vec<Value>);

impl Key {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.0.as_slice() {
            return write!(f, "{single}");
        }
        write!(f, "(")?;
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Vec<Value>> for Key {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(vec![value.into()])
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(vec![value.into()])
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Self(vec![value.into()])
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self(vec![value.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Key {
    fn from((a, b): (A, B)) -> Self {
        Self(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Key {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(Value::from(0.0), Value::from(-0.0));
        assert_eq!(Value::from(1), Value::from(1.0));
        assert!(Value::from(1.0) < Value::from(2.0));
        assert!(Value::from(f64::NEG_INFINITY) < Value::from(-1e300));
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
    }

    #[test]
    fn nan_ranks_above_every_number() {
        let nan = Value::from(f64::NAN);
        let negative_nan = Value::from(-f64::NAN);
        let one = Value::from(1.0);
        let inf = Value::from(f64::INFINITY);
        assert_eq!(negative_nan, nan);
        assert!(negative_nan > one);
        assert!(nan > inf);
        assert!(one < nan);
        let mut values = vec![negative_nan, one.clone(), inf.clone(), Value::from(-1.0)];
        values.sort();
        assert_eq!(values, vec![Value::from(-1.0), one, inf, nan]);
    }

    #[test]
    fn bools_are_not_numbers() {
        assert_ne!(Value::from(true), Value::from(1.0));
        assert_eq!(Value::from(true).as_f64(), None);
        assert!(!Value::from(false).is_acceptable_default());
    }

    #[test]
    fn hash_agrees_with_equality() {
        let set: HashSet<Value> = [Value::from(0.0), Value::from(-0.0), Value::from("a")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn key_display() {
        assert_eq!(Key::from("a").to_string(), "a");
        assert_eq!(Key::from(("a", 2)).to_string(), "(a, 2)");
        assert_eq!(Key::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn value_serializes_non_finite_as_text() {
        let json = serde_json::to_string(&vec![
            Value::from(f64::INFINITY),
            Value::from(3.0),
            Value::Null,
        ])
        .expect("serialize values");
        assert_eq!(json, r#"["inf",3.0,null]"#);
    }
}
