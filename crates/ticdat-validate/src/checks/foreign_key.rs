//! Foreign key resolution.

use std::collections::HashSet;

use ticdat_model::{Cardinality, DataSet, ForeignKey, Key, Result, Table, TableEntry, Value};

use crate::report::ForeignKeyFailures;

/// How native values are looked up in the foreign table.
enum Lookup<'a> {
    /// Native values, reordered into the foreign primary key, are a key.
    PrimaryKey {
        table: &'a Table,
        native_fields: Vec<&'a str>,
    },
    /// Native values must equal the projection of at least one foreign key.
    Projection {
        native_fields: Vec<&'a str>,
        projected: HashSet<Vec<Value>>,
    },
}

impl<'a> Lookup<'a> {
    fn new(fk: &'a ForeignKey, foreign: &'a Table) -> Self {
        let foreign_to_native = fk.foreign_to_native();
        match fk.cardinality {
            Cardinality::ManyToOne => Lookup::PrimaryKey {
                table: foreign,
                // foreign primary key order
                native_fields: foreign
                    .primary_key()
                    .iter()
                    .filter_map(|field| foreign_to_native.get(field.as_str()).copied())
                    .collect(),
            },
            Cardinality::ManyToMany => {
                let positions: Vec<usize> = fk
                    .foreign_fields()
                    .iter()
                    .filter_map(|field| foreign.primary_key().iter().position(|pk| pk == field))
                    .collect();
                let projected = foreign
                    .keys()
                    .map(|key| {
                        positions
                            .iter()
                            .map(|idx| key.values()[*idx].clone())
                            .collect()
                    })
                    .collect();
                Lookup::Projection {
                    native_fields: fk.native_fields(),
                    projected,
                }
            }
        }
    }

    fn resolves(&self, entry: &TableEntry<'_>) -> bool {
        let view = entry.view();
        let values = |fields: &[&str]| -> Option<Vec<Value>> {
            fields
                .iter()
                .map(|field| view.get(field).ok().cloned())
                .collect()
        };
        match self {
            Lookup::PrimaryKey {
                table,
                native_fields,
            } => values(native_fields.as_slice()).is_some_and(|values| table.contains_key(&Key::new(values))),
            Lookup::Projection {
                native_fields,
                projected,
            } => values(native_fields.as_slice()).is_some_and(|values| projected.contains(&values)),
        }
    }
}

pub fn check(fks: &[ForeignKey], data: &dyn DataSet) -> Result<ForeignKeyFailures> {
    let mut failures = ForeignKeyFailures::new();
    for fk in fks {
        let native = data.table(&fk.native_table)?;
        let foreign = data.table(&fk.foreign_table)?;
        let lookup = Lookup::new(fk, foreign);
        let mut failed = 0usize;
        for entry in native.entries() {
            if !lookup.resolves(&entry) {
                failed += 1;
                failures
                    .entry(fk.native_table.clone())
                    .or_default()
                    .entry(entry.id())
                    .or_default()
                    .insert(fk.clone());
            }
        }
        tracing::debug!(foreign_key = %fk, failed, "Checked foreign key");
    }
    Ok(failures)
}
