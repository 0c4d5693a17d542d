//! Schema and data set model for tabular optimization input.
//!
//! # Module Organization
//!
//! - [`value`]: Cell values and primary keys
//! - [`types`]: Per-field type constraints
//! - [`foreign_key`]: References between tables
//! - [`predicate`]: Row-level validity rules
//! - [`row`]: Fixed-shape data rows
//! - [`schema`]: Schema declaration and the finished schema
//! - [`tic_dat`]: Mutable and frozen data sets
//! - [`slicer`]: Wildcard lookup over tuples
//!
//! # Example
//!
//! ```
//! use ticdat_model::{DataSet, Key, SchemaBuilder, TypeConstraint, Value};
//!
//! let mut builder = SchemaBuilder::new();
//! builder.add_table("foods", ["Name"], ["Cost"]).expect("table");
//! builder
//!     .set_data_type("foods", "Cost", TypeConstraint::builder().build().expect("type"))
//!     .expect("data type");
//! let schema = builder.build().expect("schema");
//!
//! let mut dat = schema.tic_dat();
//! dat.table_mut("foods").expect("foods").insert("pizza", 2.5).expect("row");
//! let dat = dat.freeze();
//!
//! let cost = dat.table("foods").expect("foods").get(&Key::from("pizza")).map(|row| row.values()[0].clone());
//! assert_eq!(cost, Some(Value::from(2.5)));
//! ```

pub mod datetime;
pub mod error;
pub mod foreign_key;
pub mod predicate;
pub mod row;
pub mod schema;
pub mod slicer;
pub mod tic_dat;
pub mod types;
pub mod value;

pub use datetime::to_datetime;
pub use error::{Result, TicDatError};
pub use foreign_key::{Cardinality, ForeignKey, ForeignKeyMapping};
pub use predicate::{FailureResponse, PredicateArgs, PredicateContext, RowPredicate, RowView, Verdict};
pub use row::{DataRow, RowInput, RowLayout};
pub use schema::{
    NamedPredicate, PARAMETER_PREDICATE, PARAMETER_VALUE_FIELD, PARAMETERS_TABLE, Parameter,
    Schema, SchemaBuilder, TableSchema, normalized_name,
};
pub use slicer::{Slicer, WILDCARD};
pub use tic_dat::{
    DataInput, DataSet, FrozenTicDat, RowId, Table, TableEntry, TableInput, TableRows, TicDat,
};
pub use types::{NumberRange, StringsAllowed, TypeConstraint, TypeConstraintBuilder};
pub use value::{DATETIME_FORMAT, Key, Value};
