//! Fixed-shape data rows.
//!
//! Every table gets one [`RowLayout`] when its schema is built: the ordered
//! data-field list, the field-to-position lookup and the default for each
//! position. Rows of that table share the layout and store their values
//! positionally.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TicDatError};
use crate::value::Value;

/// Field list and defaults shared by all rows of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    table: String,
    fields: Vec<String>,
    positions: HashMap<String, usize>,
    defaults: Vec<Value>,
}

impl RowLayout {
    pub(crate) fn new(table: &str, fields: &[String], defaults: Vec<Value>) -> Self {
        debug_assert_eq!(fields.len(), defaults.len());
        let positions = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.clone(), idx))
            .collect();
        Self {
            table: table.to_string(),
            fields: fields.to_vec(),
            positions,
            defaults,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    pub fn default_value(&self, field: &str) -> Option<&Value> {
        self.position(field).map(|idx| &self.defaults[idx])
    }

    fn unknown_field(&self, field: &str) -> TicDatError {
        TicDatError::UnknownField {
            table: self.table.clone(),
            field: field.to_string(),
        }
    }

    /// Build a row of this layout from any accepted input shape.
    pub fn build_row(self: &Arc<Self>, input: RowInput) -> Result<DataRow> {
        let values = match input {
            RowInput::Mapping(mapping) => {
                let mut values = self.defaults.clone();
                for (field, value) in mapping {
                    let idx = self
                        .position(&field)
                        .ok_or_else(|| self.unknown_field(&field))?;
                    values[idx] = value;
                }
                values
            }
            RowInput::Sequence(values) => {
                if values.len() != self.len() {
                    return Err(TicDatError::RowArity {
                        table: self.table.clone(),
                        expected: self.len(),
                        found: values.len(),
                    });
                }
                values
            }
            RowInput::Scalar(value) => {
                if self.len() != 1 {
                    return Err(TicDatError::RowArity {
                        table: self.table.clone(),
                        expected: self.len(),
                        found: 1,
                    });
                }
                vec![value]
            }
        };
        Ok(DataRow {
            layout: Arc::clone(self),
            values,
        })
    }

    /// A row holding the declared defaults.
    pub fn default_row(self: &Arc<Self>) -> DataRow {
        DataRow {
            layout: Arc::clone(self),
            values: self.defaults.clone(),
        }
    }
}

/// Row input, classified once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RowInput {
    /// Field name to value; absent fields take their defaults.
    Mapping(BTreeMap<String, Value>),
    /// Values in declared field order; the length must match exactly.
    Sequence(Vec<Value>),
    /// A bare value, only for layouts with exactly one field.
    Scalar(Value),
}

impl RowInput {
    /// Input for a row with no data fields.
    pub fn empty() -> Self {
        RowInput::Sequence(Vec::new())
    }

    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        RowInput::Mapping(
            pairs
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Vec<Value>> for RowInput {
    fn from(values: Vec<Value>) -> Self {
        RowInput::Sequence(values)
    }
}

impl From<BTreeMap<String, Value>> for RowInput {
    fn from(mapping: BTreeMap<String, Value>) -> Self {
        RowInput::Mapping(mapping)
    }
}

impl From<Value> for RowInput {
    fn from(value: Value) -> Self {
        RowInput::Scalar(value)
    }
}

impl From<f64> for RowInput {
    fn from(value: f64) -> Self {
        RowInput::Scalar(value.into())
    }
}

impl From<&str> for RowInput {
    fn from(value: &str) -> Self {
        RowInput::Scalar(value.into())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for RowInput {
    fn from(pairs: [(K, V); N]) -> Self {
        RowInput::mapping(pairs)
    }
}

/// The data-field values of one row.
#[derive(Clone)]
pub struct DataRow {
    layout: Arc<RowLayout>,
    values: Vec<Value>,
}

impl DataRow {
    pub fn layout(&self) -> &Arc<RowLayout> {
        &self.layout
    }

    pub fn table(&self) -> &str {
        self.layout.table()
    }

    pub fn get(&self, field: &str) -> Result<&Value> {
        self.layout
            .position(field)
            .map(|idx| &self.values[idx])
            .ok_or_else(|| self.layout.unknown_field(field))
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self
            .layout
            .position(field)
            .ok_or_else(|| self.layout.unknown_field(field))?;
        self.values[idx] = value.into();
        Ok(())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.layout.position(field).is_some()
    }

    pub fn fields(&self) -> &[String] {
        self.layout.fields()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.layout
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for DataRow {
    fn eq(&self, other: &Self) -> bool {
        self.layout.table() == other.layout.table()
            && self.layout.fields() == other.layout.fields()
            && self.values == other.values
    }
}

impl fmt::Debug for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
