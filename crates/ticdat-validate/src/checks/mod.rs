//! The individual checks.

pub mod datatype;
pub mod duplicates;
pub mod foreign_key;
pub mod row_predicate;

use ticdat_model::{DataSet, Result, Schema};

use crate::report::ValidationReport;

/// Run the checks that operate on a built data set.
pub fn run_all(schema: &Schema, data: &dyn DataSet) -> Result<ValidationReport> {
    Ok(ValidationReport {
        duplicates: Default::default(),
        foreign_keys: foreign_key::check(schema.foreign_keys(), data)?,
        data_types: datatype::check(schema, data)?,
        data_rows: row_predicate::check(schema, data)?,
    })
}
