//! Failure reports returned by the checks.
//!
//! Every report is plain data keyed by table name. An empty report means the
//! data set passed the corresponding check.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use ticdat_model::{ForeignKey, Key, RowId, Value};

/// `{table: {primary key: occurrence count}}`, only keys seen more than once.
pub type DuplicateFailures = BTreeMap<String, BTreeMap<Key, usize>>;

/// `{native table: {row: foreign keys that do not resolve}}`.
pub type ForeignKeyFailures = BTreeMap<String, BTreeMap<RowId, BTreeSet<ForeignKey>>>;

/// `{table: {field: failure}}`.
pub type DataTypeFailures = BTreeMap<String, BTreeMap<String, DataTypeFailure>>;

/// `{table: {predicate name: failing rows}}`.
pub type DataRowFailures = BTreeMap<String, BTreeMap<String, PredicateFailures>>;

/// Cells of one field that violate its type constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataTypeFailure {
    /// Distinct offending values.
    pub bad_values: BTreeSet<Value>,
    pub rows: BTreeSet<RowId>,
}

/// Rows failing one predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PredicateFailures {
    /// Boolean predicates only identify the rows.
    Rows(BTreeSet<RowId>),
    /// Message predicates describe each failure.
    Messages(BTreeMap<RowId, String>),
}

impl PredicateFailures {
    pub fn len(&self) -> usize {
        match self {
            PredicateFailures::Rows(rows) => rows.len(),
            PredicateFailures::Messages(messages) => messages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, row: &RowId) -> bool {
        match self {
            PredicateFailures::Rows(rows) => rows.contains(row),
            PredicateFailures::Messages(messages) => messages.contains_key(row),
        }
    }

    pub fn message(&self, row: &RowId) -> Option<&str> {
        match self {
            PredicateFailures::Rows(_) => None,
            PredicateFailures::Messages(messages) => messages.get(row).map(String::as_str),
        }
    }
}

/// Number of failing rows (or keys) per check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    pub duplicates: usize,
    pub foreign_keys: usize,
    pub data_types: usize,
    pub data_rows: usize,
}

impl FailureCounts {
    pub fn total(&self) -> usize {
        self.duplicates + self.foreign_keys + self.data_types + self.data_rows
    }
}

/// Results of all four checks for one data set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub duplicates: DuplicateFailures,
    pub foreign_keys: ForeignKeyFailures,
    pub data_types: DataTypeFailures,
    pub data_rows: DataRowFailures,
}

impl ValidationReport {
    /// Whether every check passed.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
            && self.foreign_keys.is_empty()
            && self.data_types.is_empty()
            && self.data_rows.is_empty()
    }

    pub fn counts(&self) -> FailureCounts {
        FailureCounts {
            duplicates: self.duplicates.values().map(BTreeMap::len).sum(),
            foreign_keys: self.foreign_keys.values().map(BTreeMap::len).sum(),
            data_types: self
                .data_types
                .values()
                .flat_map(BTreeMap::values)
                .map(|failure| failure.rows.len())
                .sum(),
            data_rows: self
                .data_rows
                .values()
                .flat_map(BTreeMap::values)
                .map(PredicateFailures::len)
                .sum(),
        }
    }

    /// Failure counts restricted to one table.
    pub fn table_counts(&self, table: &str) -> FailureCounts {
        FailureCounts {
            duplicates: self.duplicates.get(table).map_or(0, BTreeMap::len),
            foreign_keys: self.foreign_keys.get(table).map_or(0, BTreeMap::len),
            data_types: self.data_types.get(table).map_or(0, |fields| {
                fields.values().map(|failure| failure.rows.len()).sum()
            }),
            data_rows: self.data_rows.get(table).map_or(0, |predicates| {
                predicates.values().map(PredicateFailures::len).sum()
            }),
        }
    }

    /// Tables with at least one failure of any kind.
    pub fn failing_tables(&self) -> BTreeSet<&str> {
        self.duplicates
            .keys()
            .chain(self.foreign_keys.keys())
            .chain(self.data_types.keys())
            .chain(self.data_rows.keys())
            .map(String::as_str)
            .collect()
    }

    /// Plain-text listing, one failure per line, in table order.
    pub fn render_text(&self) -> String {
        if self.is_clean() {
            return "no failures\n".to_string();
        }
        let mut lines = Vec::new();
        if !self.duplicates.is_empty() {
            lines.push("duplicate primary keys:".to_string());
            lines.extend(self.duplicates.iter().flat_map(|(table, keys)| {
                keys.iter()
                    .map(move |(key, count)| format!("  {table} {key}: {count} rows"))
            }));
        }
        if !self.foreign_keys.is_empty() {
            lines.push("foreign key failures:".to_string());
            for (table, rows) in &self.foreign_keys {
                for (row, keys) in rows {
                    lines.extend(keys.iter().map(|fk| format!("  {table} {row}: {fk}")));
                }
            }
        }
        if !self.data_types.is_empty() {
            lines.push("data type failures:".to_string());
            for (table, fields) in &self.data_types {
                for (field, failure) in fields {
                    let values: Vec<String> =
                        failure.bad_values.iter().map(ToString::to_string).collect();
                    lines.push(format!(
                        "  {table}.{field}: {} rows, bad values [{}]",
                        failure.rows.len(),
                        values.join(", ")
                    ));
                }
            }
        }
        if !self.data_rows.is_empty() {
            lines.push("row predicate failures:".to_string());
            for (table, predicates) in &self.data_rows {
                for (name, failures) in predicates {
                    match failures {
                        PredicateFailures::Rows(rows) => lines.extend(
                            rows.iter()
                                .map(|row| format!("  {table} [{name}] {row}")),
                        ),
                        PredicateFailures::Messages(messages) => {
                            lines.extend(messages.iter().map(|(row, message)| {
                                format!("  {table} [{name}] {row}: {message}")
                            }));
                        }
                    }
                }
            }
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
