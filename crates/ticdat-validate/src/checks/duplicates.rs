//! Duplicate primary keys in raw input.

use std::collections::BTreeMap;

use ticdat_model::{DataInput, Key, Result, Schema, TableInput};

use crate::report::DuplicateFailures;

pub fn check(schema: &Schema, input: &DataInput) -> Result<DuplicateFailures> {
    let mut failures = DuplicateFailures::new();
    for (name, rows) in input.tables() {
        let table = schema.table(name)?;
        if !table.is_keyed() {
            continue;
        }
        let mut counts: BTreeMap<Key, usize> = BTreeMap::new();
        match rows {
            TableInput::Rows(rows) => {
                for row in rows {
                    let (key, _) = table.split_row(row.clone())?;
                    *counts.entry(key).or_default() += 1;
                }
            }
            TableInput::Keyed(rows) => {
                for (key, _) in rows {
                    *counts.entry(key.clone()).or_default() += 1;
                }
            }
        }
        counts.retain(|_, count| *count > 1);
        tracing::debug!(table = name, duplicated = counts.len(), "Checked duplicates");
        if !counts.is_empty() {
            failures.insert(name.to_string(), counts);
        }
    }
    Ok(failures)
}
