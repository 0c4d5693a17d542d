//! Per-field type constraint checks.

use ticdat_model::{DataSet, Result, Schema};

use crate::report::DataTypeFailures;

pub fn check(schema: &Schema, data: &dyn DataSet) -> Result<DataTypeFailures> {
    let mut failures = DataTypeFailures::new();
    for (table_name, field, constraint) in schema.data_types() {
        let table = data.table(table_name)?;
        for entry in table.entries() {
            let value = entry.view().get(field)?;
            if constraint.valid(value) {
                continue;
            }
            let failure = failures
                .entry(table_name.to_string())
                .or_default()
                .entry(field.to_string())
                .or_default();
            failure.bad_values.insert(value.clone());
            failure.rows.insert(entry.id());
        }
        tracing::debug!(
            table = table_name,
            field,
            failed = failures
                .get(table_name)
                .and_then(|fields| fields.get(field))
                .map_or(0, |failure| failure.rows.len()),
            "Checked data type"
        );
    }
    Ok(failures)
}
