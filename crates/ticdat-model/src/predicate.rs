//! Row-level predicates attached to tables.
//!
//! A predicate sees one row at a time (primary-key fields included) together
//! with a set of auxiliary arguments. The arguments come from an optional
//! maker that runs once per data set, with the fully resolved parameter
//! values at hand.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TicDatError};
use crate::row::DataRow;
use crate::tic_dat::DataSet;
use crate::value::{Key, Value};

/// Auxiliary keyword arguments passed to every evaluation of a predicate.
pub type PredicateArgs = BTreeMap<String, Value>;

type BooleanCheck = dyn Fn(&RowView<'_>, &PredicateArgs) -> bool + Send + Sync;
type MessageCheck = dyn Fn(&RowView<'_>, &PredicateArgs) -> std::result::Result<(), String> + Send + Sync;
type ArgsMaker = dyn Fn(&PredicateContext<'_>) -> PredicateArgs + Send + Sync;

/// Data-set-wide inputs available to an argument maker.
pub struct PredicateContext<'a> {
    /// Every declared parameter resolved to its supplied value or default.
    pub parameters: &'a BTreeMap<String, Value>,
    pub data: &'a dyn DataSet,
}

/// How a predicate reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureResponse {
    /// Pass or fail only.
    Boolean,
    /// Failures carry a message describing the problem.
    ErrorMessage,
}

/// Outcome of evaluating a predicate against one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    FailWith(String),
}

#[derive(Clone)]
enum Check {
    Boolean(Arc<BooleanCheck>),
    Message(Arc<MessageCheck>),
}

/// A named validity rule evaluated per row.
#[derive(Clone)]
pub struct RowPredicate {
    check: Check,
    args_maker: Option<Arc<ArgsMaker>>,
}

impl RowPredicate {
    /// Predicate answering pass/fail.
    pub fn boolean<F>(check: F) -> Self
    where
        F: Fn(&RowView<'_>, &PredicateArgs) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Check::Boolean(Arc::new(check)),
            args_maker: None,
        }
    }

    /// Predicate answering `Ok(())` or a message describing the failure.
    pub fn with_message<F>(check: F) -> Self
    where
        F: Fn(&RowView<'_>, &PredicateArgs) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self {
            check: Check::Message(Arc::new(check)),
            args_maker: None,
        }
    }

    /// Attach an argument maker, run once per data set.
    #[must_use]
    pub fn with_args<F>(mut self, maker: F) -> Self
    where
        F: Fn(&PredicateContext<'_>) -> PredicateArgs + Send + Sync + 'static,
    {
        self.args_maker = Some(Arc::new(maker));
        self
    }

    pub fn response(&self) -> FailureResponse {
        match self.check {
            Check::Boolean(_) => FailureResponse::Boolean,
            Check::Message(_) => FailureResponse::ErrorMessage,
        }
    }

    pub fn has_args_maker(&self) -> bool {
        self.args_maker.is_some()
    }

    /// Build the auxiliary arguments for one data set.
    pub fn make_args(&self, context: &PredicateContext<'_>) -> PredicateArgs {
        self.args_maker
            .as_ref()
            .map(|maker| maker(context))
            .unwrap_or_default()
    }

    pub fn evaluate(&self, row: &RowView<'_>, args: &PredicateArgs) -> Verdict {
        match &self.check {
            Check::Boolean(check) => {
                if check(row, args) {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                }
            }
            Check::Message(check) => match check(row, args) {
                Ok(()) => Verdict::Pass,
                Err(message) => Verdict::FailWith(message),
            },
        }
    }
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowPredicate")
            .field("response", &self.response())
            .field("has_args_maker", &self.has_args_maker())
            .finish()
    }
}

/// A row as seen by a predicate: primary-key fields plus data fields.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    primary_key: &'a [String],
    key: Option<&'a Key>,
    row: &'a DataRow,
}

impl<'a> RowView<'a> {
    pub fn new(primary_key: &'a [String], key: Option<&'a Key>, row: &'a DataRow) -> Self {
        Self {
            primary_key,
            key,
            row,
        }
    }

    pub fn table(&self) -> &str {
        self.row.table()
    }

    pub fn key(&self) -> Option<&'a Key> {
        self.key
    }

    pub fn data(&self) -> &'a DataRow {
        self.row
    }

    /// Look up a primary-key or data field.
    pub fn get(&self, field: &str) -> Result<&'a Value> {
        if let Some(idx) = self.primary_key.iter().position(|name| name == field) {
            return self
                .key
                .and_then(|key| key.values().get(idx))
                .ok_or_else(|| TicDatError::UnknownField {
                    table: self.row.table().to_string(),
                    field: field.to_string(),
                });
        }
        self.row.get(field)
    }

    /// Numeric value of a field, `None` if absent or not a number.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).ok().and_then(Value::as_f64)
    }

    /// Text value of a field, `None` if absent or not text.
    pub fn text(&self, field: &str) -> Option<&'a str> {
        self.get(field).ok().and_then(Value::as_str)
    }
}
