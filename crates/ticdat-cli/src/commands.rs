//! Subcommand implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use ticdat_io::{SchemaFile, WriteOptions, format_for_path};
use ticdat_model::{DataSet, FrozenTicDat, Schema, Table, TicDat};
use ticdat_validate::{ValidationReport, find_duplicates, validate_input};

/// Outcome of `ticdat validate`.
#[derive(Debug)]
pub struct ValidationRun {
    pub input: PathBuf,
    pub data: FrozenTicDat,
    pub report: ValidationReport,
}

impl ValidationRun {
    pub fn has_failures(&self) -> bool {
        !self.report.is_clean()
    }
}

/// Outcome of `ticdat convert`.
#[derive(Debug)]
pub struct ConversionRun {
    pub output: PathBuf,
    pub tables: usize,
    pub rows: usize,
}

pub fn load_schema(path: &Path) -> Result<Schema> {
    let file = SchemaFile::load(path)
        .with_context(|| format!("read schema file {}", path.display()))?;
    file.build()
        .with_context(|| format!("build schema from {}", path.display()))
}

pub fn run_validate(schema_path: &Path, input: &Path) -> Result<ValidationRun> {
    let span = info_span!("validate", input = %input.display());
    let _guard = span.enter();
    let schema = load_schema(schema_path)?;
    let raw = format_for_path(&schema, input)
        .read_input(input)
        .with_context(|| format!("read {}", input.display()))?;
    let (data, report) = validate_input(&schema, &raw).context("validate data set")?;
    Ok(ValidationRun {
        input: input.to_path_buf(),
        data,
        report,
    })
}

pub fn run_convert(
    schema_path: &Path,
    input: &Path,
    output: &Path,
    force: bool,
) -> Result<ConversionRun> {
    let span = info_span!("convert", input = %input.display(), output = %output.display());
    let _guard = span.enter();
    let schema = load_schema(schema_path)?;
    let raw = format_for_path(&schema, input)
        .read_input(input)
        .with_context(|| format!("read {}", input.display()))?;

    let duplicates = find_duplicates(&schema, &raw).context("find duplicates")?;
    if !duplicates.is_empty() {
        let count: usize = duplicates.values().map(BTreeMap::len).sum();
        bail!(
            "{} has {count} duplicated primary keys, run validate for details",
            input.display()
        );
    }

    let data = TicDat::from_input(&schema, &raw).context("build data set")?;
    let options = WriteOptions {
        allow_overwrite: force,
    };
    format_for_path(&schema, output)
        .write(&data, output, options)
        .with_context(|| format!("write {}", output.display()))?;

    let rows: usize = data.tables().iter().map(Table::len).sum();
    info!(tables = data.tables().len(), rows, "Converted data set");
    Ok(ConversionRun {
        output: output.to_path_buf(),
        tables: data.table_names().len(),
        rows,
    })
}
