//! Schema description files.
//!
//! A schema can be described in JSON and built without code. Row predicates
//! are code, so they can only be attached through [`SchemaBuilder`] after
//! [`SchemaFile::builder`].
//!
//! ```json
//! {
//!   "tables": [
//!     {"name": "foods", "primary_key": ["Name"], "data_fields": ["Cost"]}
//!   ],
//!   "data_types": [
//!     {"table": "foods", "field": "Cost", "data_type": {"max": "inf", "inclusive_max": true}}
//!   ],
//!   "default_values": [{"table": "foods", "field": "Cost", "value": 1}],
//!   "foreign_keys": [],
//!   "parameters": []
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use ticdat_model::{Schema, SchemaBuilder, StringsAllowed, TypeConstraint, Value, WILDCARD};

use crate::coerce;
use crate::error::{FormatError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub name: String,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub data_fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BoundSpec {
    Number(f64),
    Text(String),
}

fn bound<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    match BoundSpec::deserialize(deserializer)? {
        BoundSpec::Number(number) => Ok(number),
        BoundSpec::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("{text} is not a number"))),
    }
}

/// `"*"` for any string, or a list of allowed strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringsSpec {
    Marker(String),
    OneOf(Vec<String>),
}

fn default_true() -> bool {
    true
}

fn default_min() -> f64 {
    0.0
}

fn default_max() -> f64 {
    f64::INFINITY
}

/// A type constraint; absent keys take the usual defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataTypeSpec {
    #[serde(default = "default_true")]
    pub number_allowed: bool,
    #[serde(default = "default_min", deserialize_with = "bound")]
    pub min: f64,
    #[serde(default = "default_max", deserialize_with = "bound")]
    pub max: f64,
    #[serde(default = "default_true")]
    pub inclusive_min: bool,
    #[serde(default)]
    pub inclusive_max: bool,
    #[serde(default)]
    pub must_be_int: bool,
    #[serde(default)]
    pub strings_allowed: Option<StringsSpec>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub datetime: bool,
}

impl DataTypeSpec {
    pub fn to_constraint(&self) -> Result<TypeConstraint> {
        if self.datetime {
            return Ok(TypeConstraint::datetime(self.nullable));
        }
        let strings = match &self.strings_allowed {
            None => StringsAllowed::None,
            Some(StringsSpec::Marker(marker)) if marker == WILDCARD => StringsAllowed::Any,
            Some(StringsSpec::Marker(other)) => {
                return Err(ticdat_model::TicDatError::InvalidTypeConstraint(format!(
                    "strings_allowed must be {WILDCARD:?} or a list of strings, found {other:?}"
                ))
                .into());
            }
            Some(StringsSpec::OneOf(allowed)) => {
                StringsAllowed::OneOf(allowed.iter().cloned().collect())
            }
        };
        Ok(TypeConstraint::builder()
            .number_allowed(self.number_allowed)
            .min(self.min)
            .max(self.max)
            .inclusive_min(self.inclusive_min)
            .inclusive_max(self.inclusive_max)
            .must_be_int(self.must_be_int)
            .nullable(self.nullable)
            .strings_allowed(strings)
            .build()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDataType {
    pub table: String,
    pub field: String,
    pub data_type: DataTypeSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultSpec {
    pub table: String,
    pub field: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeySpec {
    pub native_table: String,
    pub foreign_table: String,
    /// `[native field, foreign field]` pairs.
    pub mappings: Vec<(String, String)>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    pub name: String,
    pub default: serde_json::Value,
    #[serde(default)]
    pub data_type: Option<DataTypeSpec>,
}

/// A schema described in JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    pub tables: Vec<TableSpec>,
    #[serde(default)]
    pub data_types: Vec<FieldDataType>,
    #[serde(default)]
    pub default_values: Vec<DefaultSpec>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySpec>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl SchemaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| FormatError::io(path, err))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| FormatError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A scalar from the file. `"inf"` and `"-inf"` are numbers.
    fn literal(json: &serde_json::Value, what: &str) -> Result<Value> {
        coerce::from_json(json, None).ok_or_else(|| {
            ticdat_model::TicDatError::InvalidSchema(format!("{what} must be a scalar")).into()
        })
    }

    /// A builder holding every declaration, ready for row predicates.
    pub fn builder(&self) -> Result<SchemaBuilder> {
        let mut builder = SchemaBuilder::new();
        for table in &self.tables {
            builder.add_table(&table.name, &table.primary_key, &table.data_fields)?;
        }
        for entry in &self.data_types {
            builder.set_data_type(&entry.table, &entry.field, entry.data_type.to_constraint()?)?;
        }
        for entry in &self.default_values {
            let value = Self::literal(&entry.value, "default values")?;
            builder.set_default_value(&entry.table, &entry.field, value)?;
        }
        for fk in &self.foreign_keys {
            builder.add_foreign_key(
                &fk.native_table,
                &fk.foreign_table,
                fk.mappings
                    .iter()
                    .map(|(native, foreign)| (native.as_str(), foreign.as_str())),
            )?;
        }
        for parameter in &self.parameters {
            let default = Self::literal(&parameter.default, "parameter defaults")?;
            let constraint = parameter
                .data_type
                .as_ref()
                .map(DataTypeSpec::to_constraint)
                .transpose()?;
            builder.add_parameter(&parameter.name, default, constraint)?;
        }
        Ok(builder)
    }

    pub fn build(&self) -> Result<Schema> {
        Ok(self.builder()?.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIET: &str = r#"{
        "tables": [
            {"name": "categories", "primary_key": ["Name"], "data_fields": ["Min Nutrition", "Max Nutrition"]},
            {"name": "foods", "primary_key": ["Name"], "data_fields": ["Cost"]},
            {"name": "nutrition_quantities", "primary_key": ["Food", "Category"], "data_fields": ["Quantity"]},
            {"name": "parameters", "primary_key": ["Name"], "data_fields": ["Value"]}
        ],
        "data_types": [
            {"table": "categories", "field": "Max Nutrition", "data_type": {"max": "inf", "inclusive_max": true}},
            {"table": "foods", "field": "Name", "data_type": {"number_allowed": false, "strings_allowed": "*"}}
        ],
        "default_values": [
            {"table": "categories", "field": "Max Nutrition", "value": "inf"}
        ],
        "foreign_keys": [
            {"native_table": "nutrition_quantities", "foreign_table": "foods", "mappings": [["Food", "Name"]]}
        ],
        "parameters": [
            {"name": "Adjuster", "default": 1, "data_type": {"min": 0}}
        ]
    }"#;

    #[test]
    fn builds_diet_schema() {
        let schema = SchemaFile::parse(DIET).expect("parse").build().expect("build");
        assert_eq!(schema.tables().len(), 4);
        assert_eq!(
            schema.default_value("categories", "Max Nutrition"),
            Ok(&Value::from(f64::INFINITY))
        );
        let max = schema
            .data_type("categories", "Max Nutrition")
            .expect("data type");
        assert!(max.valid(&Value::from(f64::INFINITY)));
        assert!(
            schema
                .data_type("foods", "Name")
                .expect("data type")
                .valid(&Value::text("pizza"))
        );
        assert_eq!(schema.foreign_keys().len(), 1);
        assert_eq!(schema.parameters()[0].default, Value::from(1.0));
    }

    #[test]
    fn rejects_bad_string_marker() {
        let text = r#"{
            "tables": [{"name": "foods", "primary_key": ["Name"], "data_fields": ["Cost"]}],
            "data_types": [{"table": "foods", "field": "Cost", "data_type": {"strings_allowed": "any"}}]
        }"#;
        let err = SchemaFile::parse(text)
            .expect("parse")
            .build()
            .expect_err("bad marker");
        assert!(err.to_string().contains("strings_allowed"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(SchemaFile::parse(r#"{"tables": [], "views": []}"#).is_err());
    }
}
