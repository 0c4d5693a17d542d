//! JSON file adapter.
//!
//! A file holds one object keyed by table name. Each table is an array of
//! rows; a row is either an array (primary-key fields, then data fields) or
//! an object from field name to value.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ticdat_model::{DataInput, DataSet, RowInput, Schema, TableInput, TableSchema, Value};

use crate::coerce;
use crate::error::{FormatError, Result};
use crate::names;
use crate::{DataFormat, WriteOptions, ensure_conforms, ensure_writable};

/// Reads and writes data sets as JSON files.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormat<'a> {
    schema: &'a Schema,
}

impl<'a> JsonFormat<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    fn read_row(&self, table: &TableSchema, json: &serde_json::Value, path: &Path) -> Result<RowInput> {
        let constraint = |field: &str| self.schema.data_type(table.name(), field);
        let bad_cell = || {
            FormatError::layout(path, format!("table {} holds a nested value", table.name()))
        };
        match json {
            serde_json::Value::Array(cells) => {
                let fields = table.all_fields();
                let values = cells
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        let field_constraint = fields.get(idx).and_then(|field| constraint(*field));
                        coerce::from_json(cell, field_constraint).ok_or_else(bad_cell)
                    })
                    .collect::<Result<Vec<Value>>>()?;
                Ok(RowInput::Sequence(values))
            }
            serde_json::Value::Object(cells) => {
                let fields = table.all_fields();
                let mut mapping = BTreeMap::new();
                for (name, cell) in cells {
                    let field = fields
                        .iter()
                        .find(|field| names::matches(field, name))
                        .map_or_else(|| name.clone(), |field| (*field).to_string());
                    let value = coerce::from_json(cell, constraint(field.as_str())).ok_or_else(bad_cell)?;
                    mapping.insert(field, value);
                }
                Ok(RowInput::Mapping(mapping))
            }
            _ => Err(FormatError::layout(
                path,
                format!("rows of table {} must be arrays or objects", table.name()),
            )),
        }
    }
}

impl DataFormat for JsonFormat<'_> {
    fn schema(&self) -> &Schema {
        self.schema
    }

    fn read_input(&self, path: &Path) -> Result<DataInput> {
        let file = File::open(path).map_err(|err| FormatError::io(path, err))?;
        let document: serde_json::Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| FormatError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let serde_json::Value::Object(entries) = document else {
            return Err(FormatError::layout(path, "top level must be an object"));
        };

        let mut input = DataInput::new();
        let mut used = Vec::new();
        for table in self.schema.tables() {
            let Some(entry) = names::find_unique(table.name(), entries.keys().map(String::as_str), path)?
            else {
                continue;
            };
            used.push(entry.to_string());
            let serde_json::Value::Array(rows) = &entries[entry] else {
                return Err(FormatError::layout(
                    path,
                    format!("table {} must be an array of rows", table.name()),
                ));
            };
            let rows = rows
                .iter()
                .map(|row| self.read_row(table, row, path))
                .collect::<Result<Vec<_>>>()?;
            input.insert(table.name(), TableInput::Rows(rows));
        }
        for entry in entries.keys().filter(|entry| !used.contains(entry)) {
            tracing::warn!(path = %path.display(), entry = %entry, "Ignoring entry that matches no table");
        }
        tracing::info!(path = %path.display(), tables = used.len(), "Read JSON data");
        Ok(input)
    }

    fn write(&self, data: &dyn DataSet, path: &Path, options: WriteOptions) -> Result<()> {
        ensure_conforms(self.schema, data)?;
        ensure_writable(path, options)?;
        let mut document: BTreeMap<&str, Vec<Vec<&Value>>> = BTreeMap::new();
        for name in data.table_names() {
            let table = data.table(name)?;
            let rows = table
                .entries()
                .map(|entry| {
                    entry
                        .key
                        .map(|key| key.values())
                        .unwrap_or_default()
                        .iter()
                        .chain(entry.row.values())
                        .collect()
                })
                .collect();
            document.insert(table.name(), rows);
        }
        let file = File::create(path).map_err(|err| FormatError::io(path, err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document).map_err(|source| FormatError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|err| FormatError::io(path, err))?;
        tracing::info!(path = %path.display(), "Wrote JSON data");
        Ok(())
    }
}
