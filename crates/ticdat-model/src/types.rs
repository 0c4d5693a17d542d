//! Per-field type constraints.
//!
//! A [`TypeConstraint`] is immutable once built. Use [`TypeConstraint::builder`]
//! for numeric and string rules, or [`TypeConstraint::datetime`] for fields
//! that must hold a datetime or something that parses as one.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::datetime::to_datetime;
use crate::error::{Result, TicDatError};
use crate::value::Value;

/// Which strings a field accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringsAllowed {
    /// No string is valid.
    #[default]
    None,
    /// Any string is valid.
    Any,
    /// Only members of the set are valid.
    OneOf(BTreeSet<String>),
}

impl StringsAllowed {
    pub fn accepts(&self, text: &str) -> bool {
        match self {
            StringsAllowed::None => false,
            StringsAllowed::Any => true,
            StringsAllowed::OneOf(allowed) => allowed.contains(text),
        }
    }
}

/// Numeric range carried by a constraint that admits numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
    pub must_be_int: bool,
}

impl NumberRange {
    pub fn contains(&self, number: f64) -> bool {
        if number.is_nan() || number < self.min || number > self.max {
            return false;
        }
        if !self.inclusive_min && number == self.min {
            return false;
        }
        if !self.inclusive_max && number == self.max {
            return false;
        }
        // fract() of an infinity is NaN, so infinities land here too
        if self.must_be_int && number.fract() != 0.0 {
            // an inclusive +inf max stands in for "unbounded integer"
            return number == f64::INFINITY && self.max == f64::INFINITY && self.inclusive_max;
        }
        true
    }
}

/// Rule describing the acceptable values for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeConstraint {
    /// `None` when numbers are not allowed.
    pub numbers: Option<NumberRange>,
    pub strings: StringsAllowed,
    pub nullable: bool,
    pub datetime: bool,
}

impl TypeConstraint {
    /// Start a constraint with the usual defaults: non-negative numbers,
    /// exclusive +inf max, no strings, no nulls.
    pub fn builder() -> TypeConstraintBuilder {
        TypeConstraintBuilder::default()
    }

    /// A constraint requiring a datetime-like value.
    pub fn datetime(nullable: bool) -> Self {
        Self {
            numbers: None,
            strings: StringsAllowed::None,
            nullable,
            datetime: true,
        }
    }

    /// Any string, nothing else.
    pub fn any_string() -> Self {
        Self {
            numbers: None,
            strings: StringsAllowed::Any,
            nullable: false,
            datetime: false,
        }
    }

    pub fn number_allowed(&self) -> bool {
        self.numbers.is_some()
    }

    /// Check one value against the constraint. Never fails.
    pub fn valid(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        if self.datetime {
            return to_datetime(value).is_some();
        }
        match value {
            Value::Number(number) => self
                .numbers
                .as_ref()
                .is_some_and(|range| range.contains(*number)),
            Value::Text(text) => self.strings.accepts(text),
            _ => false,
        }
    }
}

/// Builder for [`TypeConstraint`], validated by [`TypeConstraintBuilder::build`].
#[derive(Debug, Clone)]
pub struct TypeConstraintBuilder {
    number_allowed: bool,
    min: f64,
    max: f64,
    inclusive_min: bool,
    inclusive_max: bool,
    must_be_int: bool,
    strings: StringsAllowed,
    nullable: bool,
}

impl Default for TypeConstraintBuilder {
    fn default() -> Self {
        Self {
            number_allowed: true,
            min: 0.0,
            max: f64::INFINITY,
            inclusive_min: true,
            inclusive_max: false,
            must_be_int: false,
            strings: StringsAllowed::None,
            nullable: false,
        }
    }
}

impl TypeConstraintBuilder {
    #[must_use]
    pub fn number_allowed(mut self, allowed: bool) -> Self {
        self.number_allowed = allowed;
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    #[must_use]
    pub fn inclusive_min(mut self, inclusive: bool) -> Self {
        self.inclusive_min = inclusive;
        self
    }

    #[must_use]
    pub fn inclusive_max(mut self, inclusive: bool) -> Self {
        self.inclusive_max = inclusive;
        self
    }

    #[must_use]
    pub fn must_be_int(mut self, must_be_int: bool) -> Self {
        self.must_be_int = must_be_int;
        self
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Accept any string.
    #[must_use]
    pub fn any_string(mut self) -> Self {
        self.strings = StringsAllowed::Any;
        self
    }

    /// Accept only the listed strings.
    #[must_use]
    pub fn strings<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings = StringsAllowed::OneOf(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Set the string rule directly.
    #[must_use]
    pub fn strings_allowed(mut self, strings: StringsAllowed) -> Self {
        self.strings = strings;
        self
    }

    pub fn build(self) -> Result<TypeConstraint> {
        let numbers = if self.number_allowed {
            if self.min.is_nan() || self.max.is_nan() {
                return Err(TicDatError::InvalidTypeConstraint(
                    "min and max should be numeric".to_string(),
                ));
            }
            if self.max < self.min {
                return Err(TicDatError::InvalidTypeConstraint(format!(
                    "max {} cannot be smaller than min {}",
                    self.max, self.min
                )));
            }
            Some(NumberRange {
                min: self.min,
                max: self.max,
                inclusive_min: self.inclusive_min,
                inclusive_max: self.inclusive_max,
                must_be_int: self.must_be_int,
            })
        } else {
            None
        };
        Ok(TypeConstraint {
            numbers,
            strings: self.strings,
            nullable: self.nullable,
            datetime: false,
        })
    }
}
