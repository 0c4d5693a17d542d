//! Error types for schema declaration and data set construction.
//!
//! Only structural misuse is reported through [`TicDatError`]. Problems with
//! the content of a data set (dangling foreign keys, out of range values,
//! failing predicates, duplicate keys) are returned as reports by the
//! validation crate and never show up here.

use thiserror::Error;

/// Errors raised by misuse of the schema or container APIs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicDatError {
    // === Lookup Errors ===
    /// Table is not declared by the schema.
    #[error("unknown table: {table}")]
    UnknownTable { table: String },

    /// Field is not declared for the table.
    #[error("key error: {field} is not a field of table {table}")]
    UnknownField { table: String, field: String },

    // === Shape Errors ===
    /// A row carried the wrong number of values.
    #[error("{table} requires each row to have {expected} values, found {found}")]
    RowArity {
        table: String,
        expected: usize,
        found: usize,
    },

    /// A primary key carried the wrong number of values.
    #[error("{table} requires primary keys with {expected} values, found {found}")]
    KeyArity {
        table: String,
        expected: usize,
        found: usize,
    },

    /// A bulk row lacks one of the table's primary-key fields.
    #[error("row for {table} is missing primary key field {field}")]
    MissingKeyField { table: String, field: String },

    /// Keyed access on a table without a primary key, or the reverse.
    #[error("table {table} {reason}")]
    TableKind { table: String, reason: &'static str },

    // === Declaration Errors ===
    /// Table or field declaration is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Type constraint arguments are inconsistent.
    #[error("invalid data type: {0}")]
    InvalidTypeConstraint(String),

    /// Default value is unacceptable for the field.
    #[error("invalid default for {table}.{field}: {reason}")]
    InvalidDefault {
        table: String,
        field: String,
        reason: String,
    },

    /// Foreign key references undeclared tables or fields.
    #[error("invalid foreign key: {0}")]
    InvalidForeignKey(String),

    /// Two predicates with one name on the same table.
    #[error("duplicate predicate name {name} for table {table}")]
    DuplicatePredicate { table: String, name: String },

    /// Parameter declaration is malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    // === Usage Errors ===
    /// Data set was not produced by this schema.
    #[error("data set does not match schema: {0}")]
    SchemaMismatch(String),

    /// Slicer constructed or queried with inconsistent tuples.
    #[error("slicer: {0}")]
    Slicer(String),
}

/// Result type for schema and container operations.
pub type Result<T> = std::result::Result<T, TicDatError>;

/// Return an [`TicDatError::InvalidSchema`] unless `condition` holds.
pub(crate) fn verify(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(TicDatError::InvalidSchema(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TicDatError::UnknownField {
            table: "foods".to_string(),
            field: "Price".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "key error: Price is not a field of table foods"
        );
    }

    #[test]
    fn test_verify() {
        assert!(verify(true, || "unused".to_string()).is_ok());
        assert!(matches!(
            verify(false, || "bad".to_string()),
            Err(TicDatError::InvalidSchema(message)) if message == "bad"
        ));
    }
}
