//! Schema-conformant data containers.
//!
//! [`TicDat`] is the mutable form: tables are filled by direct assignment or
//! bulk load. [`TicDat::freeze`] converts it once into a [`FrozenTicDat`],
//! which offers read access only and can be shared freely across threads.
//!
//! Mutation of a frozen data set does not compile:
//!
//! ```compile_fail
//! use ticdat_model::SchemaBuilder;
//!
//! let mut builder = SchemaBuilder::new();
//! builder.add_table("foods", ["Name"], ["Cost"]).expect("table");
//! let schema = builder.build().expect("schema");
//! let frozen = schema.tic_dat().freeze();
//! frozen.table_mut("foods");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{Result, TicDatError};
use crate::predicate::RowView;
use crate::row::{DataRow, RowInput, RowLayout};
use crate::schema::Schema;
use crate::value::Key;

/// Read access shared by mutable and frozen data sets.
pub trait DataSet {
    fn table(&self, name: &str) -> Result<&Table>;

    /// Table names in declaration order.
    fn table_names(&self) -> Vec<&str>;
}

/// Identifies a row in a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// Primary key of a row in a keyed table.
    Key(Key),
    /// Position of a row in a table without a primary key.
    Index(usize),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Key(key) => write!(f, "{key}"),
            RowId::Index(idx) => write!(f, "row {idx}"),
        }
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rows of one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRows {
    Keyed(BTreeMap<Key, DataRow>),
    Unkeyed(Vec<DataRow>),
}

/// One row of a table together with its identity.
#[derive(Debug, Clone, Copy)]
pub struct TableEntry<'a> {
    pub index: usize,
    pub key: Option<&'a Key>,
    pub row: &'a DataRow,
    primary_key: &'a [String],
}

impl<'a> TableEntry<'a> {
    pub fn id(&self) -> RowId {
        match self.key {
            Some(key) => RowId::Key(key.clone()),
            None => RowId::Index(self.index),
        }
    }

    /// Field access across primary-key and data fields.
    pub fn view(&self) -> RowView<'a> {
        RowView::new(self.primary_key, self.key, self.row)
    }
}

/// A table of a data set.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    layout: Arc<RowLayout>,
    primary_key: Arc<Vec<String>>,
    rows: TableRows,
}

impl Table {
    fn new(name: &str, layout: Arc<RowLayout>, primary_key: Arc<Vec<String>>) -> Self {
        let rows = if primary_key.is_empty() {
            TableRows::Unkeyed(Vec::new())
        } else {
            TableRows::Keyed(BTreeMap::new())
        };
        Self {
            name: name.to_string(),
            layout,
            primary_key,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn data_fields(&self) -> &[String] {
        self.layout.fields()
    }

    pub fn layout(&self) -> &Arc<RowLayout> {
        &self.layout
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self.rows, TableRows::Keyed(_))
    }

    pub fn rows(&self) -> &TableRows {
        &self.rows
    }

    pub fn len(&self) -> usize {
        match &self.rows {
            TableRows::Keyed(rows) => rows.len(),
            TableRows::Unkeyed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row in key order (keyed tables) or insertion order.
    pub fn entries(&self) -> Box<dyn Iterator<Item = TableEntry<'_>> + '_> {
        let primary_key = self.primary_key.as_slice();
        match &self.rows {
            TableRows::Keyed(rows) => Box::new(rows.iter().enumerate().map(move |(index, (key, row))| {
                TableEntry {
                    index,
                    key: Some(key),
                    row,
                    primary_key,
                }
            })),
            TableRows::Unkeyed(rows) => Box::new(rows.iter().enumerate().map(move |(index, row)| {
                TableEntry {
                    index,
                    key: None,
                    row,
                    primary_key,
                }
            })),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        let keys = match &self.rows {
            TableRows::Keyed(rows) => Some(rows.keys()),
            TableRows::Unkeyed(_) => None,
        };
        keys.into_iter().flatten()
    }

    pub fn get(&self, key: &Key) -> Option<&DataRow> {
        match &self.rows {
            TableRows::Keyed(rows) => rows.get(key),
            TableRows::Unkeyed(_) => None,
        }
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    fn check_key(&self, key: &Key) -> Result<()> {
        if key.len() != self.primary_key.len() {
            return Err(TicDatError::KeyArity {
                table: self.name.clone(),
                expected: self.primary_key.len(),
                found: key.len(),
            });
        }
        Ok(())
    }

    fn keyed_mut(&mut self) -> Result<&mut BTreeMap<Key, DataRow>> {
        match &mut self.rows {
            TableRows::Keyed(rows) => Ok(rows),
            TableRows::Unkeyed(_) => Err(kind_error(&self.name, false)),
        }
    }

    /// Set the row for `key`, replacing any existing row.
    pub fn insert(&mut self, key: impl Into<Key>, input: impl Into<RowInput>) -> Result<()> {
        let key = key.into();
        self.check_key(&key)?;
        let row = self.layout.build_row(input.into())?;
        self.keyed_mut()?.insert(key, row);
        Ok(())
    }

    /// Mutable row for `key`, created from defaults when absent.
    pub fn entry(&mut self, key: impl Into<Key>) -> Result<&mut DataRow> {
        let key = key.into();
        self.check_key(&key)?;
        let layout = Arc::clone(&self.layout);
        Ok(self
            .keyed_mut()?
            .entry(key)
            .or_insert_with(|| layout.default_row()))
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut DataRow> {
        match &mut self.rows {
            TableRows::Keyed(rows) => rows.get_mut(key),
            TableRows::Unkeyed(_) => None,
        }
    }

    pub fn remove(&mut self, key: &Key) -> Option<DataRow> {
        match &mut self.rows {
            TableRows::Keyed(rows) => rows.remove(key),
            TableRows::Unkeyed(_) => None,
        }
    }

    /// Append a row to a table without a primary key.
    pub fn push(&mut self, input: impl Into<RowInput>) -> Result<()> {
        let row = self.layout.build_row(input.into())?;
        match &mut self.rows {
            TableRows::Unkeyed(rows) => {
                rows.push(row);
                Ok(())
            }
            TableRows::Keyed(_) => Err(kind_error(&self.name, true)),
        }
    }

    /// Mutable row at `index` of a table without a primary key.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut DataRow> {
        match &mut self.rows {
            TableRows::Unkeyed(rows) => rows.get_mut(index),
            TableRows::Keyed(_) => None,
        }
    }

    pub fn clear(&mut self) {
        match &mut self.rows {
            TableRows::Keyed(rows) => rows.clear(),
            TableRows::Unkeyed(rows) => rows.clear(),
        }
    }
}

fn kind_error(table: &str, keyed: bool) -> TicDatError {
    TicDatError::TableKind {
        table: table.to_string(),
        reason: if keyed {
            "has a primary key and is accessed by key"
        } else {
            "has no primary key and is accessed by position"
        },
    }
}

/// Rows of one table before aggregation into a keyed mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum TableInput {
    /// Bulk rows; for keyed tables each row carries its primary-key fields.
    Rows(Vec<RowInput>),
    /// Explicit key and data pairs, possibly repeating keys.
    Keyed(Vec<(Key, RowInput)>),
}

impl TableInput {
    pub fn len(&self) -> usize {
        match self {
            TableInput::Rows(rows) => rows.len(),
            TableInput::Keyed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Raw input for a whole data set, as produced by a format reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataInput {
    tables: BTreeMap<String, TableInput>,
}

impl DataInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: impl Into<String>, rows: TableInput) {
        self.tables.insert(table.into(), rows);
    }

    /// Append a bulk row to `table`.
    ///
    /// # Errors
    ///
    /// Fails with [`TicDatError::TableKind`] if `table` already holds keyed
    /// input; the keyed rows are left untouched.
    pub fn push_row(&mut self, table: &str, row: impl Into<RowInput>) -> Result<()> {
        let entry = self
            .tables
            .entry(table.to_string())
            .or_insert_with(|| TableInput::Rows(Vec::new()));
        match entry {
            TableInput::Rows(rows) => {
                rows.push(row.into());
                Ok(())
            }
            TableInput::Keyed(_) => Err(TicDatError::TableKind {
                table: table.to_string(),
                reason: "already holds keyed input",
            }),
        }
    }

    pub fn get(&self, table: &str) -> Option<&TableInput> {
        self.tables.get(table)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableInput)> {
        self.tables.iter().map(|(name, rows)| (name.as_str(), rows))
    }
}

/// Mutable data set conforming to one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TicDat {
    tables: Vec<Table>,
}

impl TicDat {
    pub(crate) fn new(schema: &Schema) -> Self {
        let tables = schema
            .tables()
            .iter()
            .map(|table| {
                Table::new(
                    table.name(),
                    Arc::clone(table.layout()),
                    Arc::clone(table.shared_primary_key()),
                )
            })
            .collect();
        Self { tables }
    }

    /// Build a data set from raw input. Repeated keys keep the last row.
    pub fn from_input(schema: &Schema, input: &DataInput) -> Result<Self> {
        let mut dat = Self::new(schema);
        for (name, rows) in input.tables() {
            let table_schema = schema.table(name)?;
            let table = dat.table_mut(name)?;
            match rows {
                TableInput::Rows(rows) if table.is_keyed() => {
                    for row in rows {
                        let (key, data) = table_schema.split_row(row.clone())?;
                        table.insert(key, data)?;
                    }
                }
                TableInput::Rows(rows) => {
                    for row in rows {
                        table.push(row.clone())?;
                    }
                }
                TableInput::Keyed(rows) => {
                    for (key, data) in rows {
                        table.insert(key.clone(), data.clone())?;
                    }
                }
            }
        }
        Ok(dat)
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|table| table.name == name)
            .ok_or_else(|| TicDatError::UnknownTable {
                table: name.to_string(),
            })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Convert into the read-only form.
    pub fn freeze(self) -> FrozenTicDat {
        FrozenTicDat {
            inner: Arc::new(self),
        }
    }
}

impl DataSet for TicDat {
    fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .ok_or_else(|| TicDatError::UnknownTable {
                table: name.to_string(),
            })
    }

    fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(Table::name).collect()
    }
}

/// Read-only data set. Cloning shares the underlying tables.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenTicDat {
    inner: Arc<TicDat>,
}

impl FrozenTicDat {
    /// Already frozen; returns `self` unchanged.
    pub fn freeze(self) -> Self {
        self
    }

    /// An independent mutable copy.
    pub fn to_mutable(&self) -> TicDat {
        (*self.inner).clone()
    }

    pub fn tables(&self) -> &[Table] {
        self.inner.tables()
    }
}

impl DataSet for FrozenTicDat {
    fn table(&self, name: &str) -> Result<&Table> {
        self.inner.table(name)
    }

    fn table_names(&self) -> Vec<&str> {
        self.inner.table_names()
    }
}
