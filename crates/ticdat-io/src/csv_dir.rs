//! CSV directory adapter.
//!
//! A data set is a directory holding one `<table>.csv` per table. The header
//! row names the fields; primary-key fields come first when writing.

use std::fs;
use std::path::{Path, PathBuf};

use ticdat_model::{DataInput, DataSet, RowInput, Schema, TableInput, TableSchema, Value};

use crate::coerce;
use crate::error::{FormatError, Result};
use crate::names;
use crate::{DataFormat, WriteOptions, ensure_conforms, ensure_writable};

const EXTENSION: &str = "csv";

/// Reads and writes data sets as directories of CSV files.
#[derive(Debug, Clone, Copy)]
pub struct CsvDirFormat<'a> {
    schema: &'a Schema,
}

impl<'a> CsvDirFormat<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    fn csv_error(path: &Path, source: csv::Error) -> FormatError {
        FormatError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    fn read_table(&self, table: &TableSchema, path: &Path) -> Result<Vec<RowInput>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(path)
            .map_err(|err| Self::csv_error(path, err))?;
        let headers = reader
            .headers()
            .map_err(|err| Self::csv_error(path, err))?
            .clone();

        let mut columns = Vec::new();
        for field in table.all_fields() {
            let column = names::find_unique(field, headers.iter(), path)
                .map_err(|_| FormatError::layout(path, format!("duplicate column for field {field}")))?
                .and_then(|header| headers.iter().position(|candidate| candidate == header))
                .ok_or_else(|| FormatError::MissingColumn {
                    path: path.to_path_buf(),
                    field: field.to_string(),
                })?;
            columns.push((column, self.schema.data_type(table.name(), field)));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| Self::csv_error(path, err))?;
            let values: Vec<Value> = columns
                .iter()
                .map(|(column, constraint)| {
                    coerce::from_csv(record.get(*column).unwrap_or_default(), *constraint)
                })
                .collect();
            rows.push(RowInput::Sequence(values));
        }
        Ok(rows)
    }

    fn csv_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        let entries = fs::read_dir(dir).map_err(|err| FormatError::io(dir, err))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| FormatError::io(dir, err))?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
            if !is_csv || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }
        files.sort();
        Ok(files)
    }
}

impl DataFormat for CsvDirFormat<'_> {
    fn schema(&self) -> &Schema {
        self.schema
    }

    fn read_input(&self, path: &Path) -> Result<DataInput> {
        if !path.is_dir() {
            return Err(FormatError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let files = Self::csv_files(path)?;
        let mut input = DataInput::new();
        let mut used = Vec::new();
        for table in self.schema.tables() {
            let stems = files.iter().map(|(stem, _)| stem.as_str());
            let Some(stem) = names::find_unique(table.name(), stems, path)? else {
                continue;
            };
            let Some((_, file)) = files.iter().find(|(candidate, _)| candidate == stem) else {
                continue;
            };
            used.push(stem.to_string());
            let rows = self.read_table(table, file)?;
            tracing::debug!(table = table.name(), rows = rows.len(), "Read CSV table");
            input.insert(table.name(), TableInput::Rows(rows));
        }
        for (stem, file) in files.iter().filter(|(stem, _)| !used.contains(stem)) {
            tracing::warn!(file = %file.display(), stem = %stem, "Ignoring file that matches no table");
        }
        tracing::info!(path = %path.display(), tables = used.len(), "Read CSV directory");
        Ok(input)
    }

    fn write(&self, data: &dyn DataSet, path: &Path, options: WriteOptions) -> Result<()> {
        ensure_conforms(self.schema, data)?;
        let targets: Vec<(&str, PathBuf)> = data
            .table_names()
            .into_iter()
            .map(|name| (name, path.join(format!("{name}.{EXTENSION}"))))
            .collect();
        for (_, target) in &targets {
            ensure_writable(target, options)?;
        }
        fs::create_dir_all(path).map_err(|err| FormatError::io(path, err))?;

        for (name, target) in &targets {
            let table = data.table(name)?;
            let mut writer =
                csv::Writer::from_path(target).map_err(|err| Self::csv_error(target, err))?;
            let header: Vec<&str> = table
                .primary_key()
                .iter()
                .chain(table.data_fields())
                .map(String::as_str)
                .collect();
            writer
                .write_record(&header)
                .map_err(|err| Self::csv_error(target, err))?;
            for entry in table.entries() {
                let key_values = entry.key.map(|key| key.values()).unwrap_or_default();
                let record: Vec<String> = key_values
                    .iter()
                    .chain(entry.row.values())
                    .map(coerce::to_csv)
                    .collect();
                writer
                    .write_record(&record)
                    .map_err(|err| Self::csv_error(target, err))?;
            }
            writer.flush().map_err(|err| FormatError::io(target, err))?;
        }
        tracing::info!(path = %path.display(), tables = targets.len(), "Wrote CSV directory");
        Ok(())
    }
}
