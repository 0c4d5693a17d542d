//! Row predicate evaluation.

use std::collections::{BTreeMap, BTreeSet};

use ticdat_model::{DataSet, FailureResponse, PredicateContext, Result, Schema, Verdict};

use crate::report::{DataRowFailures, PredicateFailures};

pub fn check(schema: &Schema, data: &dyn DataSet) -> Result<DataRowFailures> {
    let parameters = schema.create_full_parameters_dict(data);
    let context = PredicateContext {
        parameters: &parameters,
        data,
    };
    let mut failures = DataRowFailures::new();
    for table_schema in schema.tables() {
        let predicates = schema.data_row_predicates(table_schema.name());
        if predicates.is_empty() {
            continue;
        }
        let table = data.table(table_schema.name())?;
        for named in predicates {
            // arguments are built once per data set, not per row
            let args = named.predicate.make_args(&context);
            let mut rows = BTreeSet::new();
            let mut messages = BTreeMap::new();
            for entry in table.entries() {
                match named.predicate.evaluate(&entry.view(), &args) {
                    Verdict::Pass => {}
                    Verdict::Fail => {
                        rows.insert(entry.id());
                    }
                    Verdict::FailWith(message) => {
                        messages.insert(entry.id(), message);
                    }
                }
            }
            let found = match named.predicate.response() {
                FailureResponse::Boolean => PredicateFailures::Rows(rows),
                FailureResponse::ErrorMessage => PredicateFailures::Messages(messages),
            };
            tracing::debug!(
                table = table_schema.name(),
                predicate = %named.name,
                failed = found.len(),
                "Checked row predicate"
            );
            if !found.is_empty() {
                failures
                    .entry(table_schema.name().to_string())
                    .or_default()
                    .insert(named.name.clone(), found);
            }
        }
    }
    Ok(failures)
}
