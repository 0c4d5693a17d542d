//! Validation of data sets against their schema.
//!
//! - **Foreign keys**: every child row resolves to a parent row
//! - **Data types**: every constrained cell satisfies its type constraint
//! - **Row predicates**: every row passes the predicates of its table
//! - **Duplicates**: no primary key repeats in the raw input rows
//!
//! Failures are returned as reports. Only structural misuse, such as a data
//! set built from a different schema, is an error.
//!
//! # Example
//!
//! ```
//! use ticdat_model::{DataInput, RowInput, SchemaBuilder};
//!
//! let mut builder = SchemaBuilder::new();
//! builder.add_table("foods", ["Name"], ["Cost"]).expect("table");
//! let schema = builder.build().expect("schema");
//!
//! let mut input = DataInput::new();
//! input.push_row("foods", RowInput::from([("Name", "pizza")])).expect("row");
//! input.push_row("foods", RowInput::from([("Name", "pizza")])).expect("row");
//!
//! let (_, report) = ticdat_validate::validate_input(&schema, &input).expect("validate");
//! assert_eq!(report.counts().duplicates, 1);
//! ```

mod checks;
mod report;

use ticdat_model::{DataInput, DataSet, FrozenTicDat, Result, Schema, TicDat, TicDatError};

pub use report::{
    DataRowFailures, DataTypeFailure, DataTypeFailures, DuplicateFailures, FailureCounts,
    ForeignKeyFailures, PredicateFailures, ValidationReport,
};

fn ensure_conforms(schema: &Schema, data: &dyn DataSet) -> Result<()> {
    if schema.good_tic_dat(data) {
        Ok(())
    } else {
        Err(TicDatError::SchemaMismatch(
            "tables or fields differ from the schema".to_string(),
        ))
    }
}

/// Rows whose foreign key values do not resolve in the referenced table.
pub fn find_foreign_key_failures(schema: &Schema, data: &dyn DataSet) -> Result<ForeignKeyFailures> {
    ensure_conforms(schema, data)?;
    checks::foreign_key::check(schema.foreign_keys(), data)
}

/// Cells violating the type constraint of their field.
pub fn find_data_type_failures(schema: &Schema, data: &dyn DataSet) -> Result<DataTypeFailures> {
    ensure_conforms(schema, data)?;
    checks::datatype::check(schema, data)
}

/// Rows failing a row predicate of their table.
pub fn find_data_row_failures(schema: &Schema, data: &dyn DataSet) -> Result<DataRowFailures> {
    ensure_conforms(schema, data)?;
    checks::row_predicate::check(schema, data)
}

/// Primary keys occurring more than once in raw input, with their counts.
pub fn find_duplicates(schema: &Schema, input: &DataInput) -> Result<DuplicateFailures> {
    checks::duplicates::check(schema, input)
}

/// Run the foreign key, data type and row predicate checks on a data set.
pub fn validate(schema: &Schema, data: &dyn DataSet) -> Result<ValidationReport> {
    ensure_conforms(schema, data)?;
    checks::run_all(schema, data)
}

/// Check raw input for duplicates, build and freeze the data set, then run
/// the remaining checks on it.
pub fn validate_input(schema: &Schema, input: &DataInput) -> Result<(FrozenTicDat, ValidationReport)> {
    let duplicates = find_duplicates(schema, input)?;
    let data = TicDat::from_input(schema, input)?.freeze();
    let mut report = checks::run_all(schema, &data)?;
    report.duplicates = duplicates;
    tracing::info!(
        clean = report.is_clean(),
        failures = report.counts().total(),
        "Validated data set"
    );
    Ok((data, report))
}
