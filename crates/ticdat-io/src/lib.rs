//! File adapters for schema-conformant data sets.
//!
//! - **JSON**: one file holding every table
//! - **CSV**: one directory holding a `<table>.csv` per table
//! - **Schema files**: schemas described in JSON
//!
//! Readers produce raw [`DataInput`] so duplicate primary keys can still be
//! found before rows are aggregated into a [`TicDat`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ticdat_io::{DataFormat, SchemaFile, WriteOptions, format_for_path};
//!
//! let schema = SchemaFile::load(Path::new("diet_schema.json"))?.build()?;
//! let dat = format_for_path(&schema, Path::new("diet.json"))
//!     .create_frozen_tic_dat(Path::new("diet.json"))?;
//! format_for_path(&schema, Path::new("diet_csv"))
//!     .write(&dat, Path::new("diet_csv"), WriteOptions::default())?;
//! # Ok::<(), ticdat_io::FormatError>(())
//! ```

mod coerce;
mod csv_dir;
mod error;
mod json;
mod names;
pub mod schema_file;

use std::path::Path;

use ticdat_model::{DataInput, DataSet, FrozenTicDat, Schema, TicDat, TicDatError};

// === Error Types ===
pub use error::{FormatError, Result};

// === Adapters ===
pub use csv_dir::CsvDirFormat;
pub use json::JsonFormat;

// === Schema Files ===
pub use schema_file::SchemaFile;

/// Options for writing a data set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Replace existing files instead of refusing to write.
    pub allow_overwrite: bool,
}

/// A file format bound to one schema.
pub trait DataFormat {
    fn schema(&self) -> &Schema;

    /// Read raw rows, before primary keys are aggregated.
    fn read_input(&self, path: &Path) -> Result<DataInput>;

    /// Write every table of `data`.
    fn write(&self, data: &dyn DataSet, path: &Path, options: WriteOptions) -> Result<()>;

    /// Read a mutable data set. Repeated primary keys keep the last row.
    fn create_tic_dat(&self, path: &Path) -> Result<TicDat> {
        let input = self.read_input(path)?;
        Ok(TicDat::from_input(self.schema(), &input)?)
    }

    /// Read a frozen data set.
    fn create_frozen_tic_dat(&self, path: &Path) -> Result<FrozenTicDat> {
        Ok(self.create_tic_dat(path)?.freeze())
    }
}

/// Pick the adapter for `path`: `.json` files use JSON, anything else is
/// treated as a CSV directory.
pub fn format_for_path<'a>(schema: &'a Schema, path: &Path) -> Box<dyn DataFormat + 'a> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonFormat::new(schema))
    } else {
        Box::new(CsvDirFormat::new(schema))
    }
}

pub(crate) fn ensure_conforms(schema: &Schema, data: &dyn DataSet) -> Result<()> {
    if schema.good_tic_dat(data) {
        Ok(())
    } else {
        Err(TicDatError::SchemaMismatch("cannot write a data set built from another schema".to_string()).into())
    }
}

pub(crate) fn ensure_writable(path: &Path, options: WriteOptions) -> Result<()> {
    if path.exists() && !options.allow_overwrite {
        return Err(FormatError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
