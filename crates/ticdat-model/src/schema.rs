//! Declarative schema: tables, defaults, data types, foreign keys, row
//! predicates and parameters.
//!
//! A schema is declared through a [`SchemaBuilder`] and finished with
//! [`SchemaBuilder::build`]. The finished [`Schema`] is immutable: every data
//! set it creates shares its per-table row layouts.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{Result, TicDatError, verify};
use crate::foreign_key::{Cardinality, ForeignKey, ForeignKeyMapping};
use crate::predicate::{RowPredicate, RowView};
use crate::row::{RowInput, RowLayout};
use crate::tic_dat::{DataSet, TicDat};
use crate::types::TypeConstraint;
use crate::value::{Key, Value};

/// Table holding (name, value) parameter pairs.
pub const PARAMETERS_TABLE: &str = "parameters";
/// The single data field of the parameters table.
pub const PARAMETER_VALUE_FIELD: &str = "Value";
/// Name of the predicate installed on the parameters table.
pub const PARAMETER_PREDICATE: &str = "Valid Parameter";

/// Form under which file readers match table and field names: trimmed,
/// lowercase, with spaces as underscores.
pub fn normalized_name(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

/// A declared parameter with its default and optional constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub default: Value,
    pub constraint: Option<TypeConstraint>,
}

/// A predicate registered under a name.
#[derive(Debug, Clone)]
pub struct NamedPredicate {
    pub name: String,
    pub predicate: RowPredicate,
}

#[derive(Debug, Clone)]
struct TableDecl {
    name: String,
    primary_key: Vec<String>,
    data_fields: Vec<String>,
    defaults: BTreeMap<String, Value>,
}

impl TableDecl {
    fn has_field(&self, field: &str) -> bool {
        self.primary_key.iter().chain(&self.data_fields).any(|f| f == field)
    }
}

/// Mutable schema declaration.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    tables: Vec<TableDecl>,
    data_types: BTreeMap<(String, String), TypeConstraint>,
    foreign_keys: Vec<ForeignKey>,
    predicates: HashMap<String, Vec<NamedPredicate>>,
    parameters: Vec<Parameter>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, table: &str) -> Result<&TableDecl> {
        self.tables
            .iter()
            .find(|decl| decl.name == table)
            .ok_or_else(|| TicDatError::UnknownTable {
                table: table.to_string(),
            })
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut TableDecl> {
        self.tables
            .iter_mut()
            .find(|decl| decl.name == table)
            .ok_or_else(|| TicDatError::UnknownTable {
                table: table.to_string(),
            })
    }

    /// Declare a table. An empty primary key makes the table a plain sequence of rows.
    pub fn add_table<P, D>(&mut self, name: &str, primary_key: P, data_fields: D) -> Result<()>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let name = name.trim();
        verify(!name.is_empty(), || "table names cannot be empty".to_string())?;
        verify(self.table(name).is_err(), || {
            format!("table {name} is declared twice")
        })?;
        if let Some(existing) = self
            .tables
            .iter()
            .find(|decl| normalized_name(&decl.name) == normalized_name(name))
        {
            return Err(TicDatError::InvalidSchema(format!(
                "tables {} and {name} differ only in case or spaces",
                existing.name
            )));
        }
        let primary_key: Vec<String> = primary_key.into_iter().map(Into::into).collect();
        let data_fields: Vec<String> = data_fields.into_iter().map(Into::into).collect();
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for field in primary_key.iter().chain(&data_fields) {
            verify(!field.trim().is_empty(), || {
                format!("table {name} has an empty field name")
            })?;
            if let Some(previous) = seen.insert(normalized_name(field), field.as_str()) {
                let reason = if previous == field.as_str() {
                    format!("field {field} appears more than once in table {name}")
                } else {
                    format!("fields {previous} and {field} of table {name} differ only in case or spaces")
                };
                return Err(TicDatError::InvalidSchema(reason));
            }
        }
        self.tables.push(TableDecl {
            name: name.to_string(),
            primary_key,
            data_fields,
            defaults: BTreeMap::new(),
        });
        Ok(())
    }

    /// Set the value used for a data field when a row omits it.
    pub fn set_default_value(&mut self, table: &str, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let constraint = self
            .data_types
            .get(&(table.to_string(), field.to_string()))
            .cloned();
        let decl = self.table_mut(table)?;
        if !decl.data_fields.iter().any(|f| f == field) {
            return Err(TicDatError::UnknownField {
                table: table.to_string(),
                field: field.to_string(),
            });
        }
        if !value.is_acceptable_default() {
            return Err(TicDatError::InvalidDefault {
                table: table.to_string(),
                field: field.to_string(),
                reason: "default values must be numeric, string or null".to_string(),
            });
        }
        if let Some(constraint) = constraint
            && !constraint.valid(&value)
        {
            return Err(TicDatError::InvalidDefault {
                table: table.to_string(),
                field: field.to_string(),
                reason: format!("{value} violates the declared data type"),
            });
        }
        decl.defaults.insert(field.to_string(), value);
        Ok(())
    }

    /// Attach a type constraint to a primary-key or data field.
    pub fn set_data_type(&mut self, table: &str, field: &str, constraint: TypeConstraint) -> Result<()> {
        let decl = self.table(table)?;
        if !decl.has_field(field) {
            return Err(TicDatError::UnknownField {
                table: table.to_string(),
                field: field.to_string(),
            });
        }
        if let Some(default) = decl.defaults.get(field)
            && !constraint.valid(default)
        {
            return Err(TicDatError::InvalidDefault {
                table: table.to_string(),
                field: field.to_string(),
                reason: format!("existing default {default} violates the new data type"),
            });
        }
        self.data_types
            .insert((table.to_string(), field.to_string()), constraint);
        Ok(())
    }

    /// Declare that `native_table` fields reference `foreign_table` primary-key fields.
    ///
    /// Each mapping pair is `(native field, foreign field)`.
    pub fn add_foreign_key<I, N, F>(&mut self, native_table: &str, foreign_table: &str, mappings: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<String>,
    {
        let fk_error = |message: String| TicDatError::InvalidForeignKey(message);
        let native = self
            .table(native_table)
            .map_err(|_| fk_error(format!("{native_table} is not a table")))?;
        let foreign = self
            .table(foreign_table)
            .map_err(|_| fk_error(format!("{foreign_table} is not a table")))?;
        let mappings: Vec<ForeignKeyMapping> = mappings
            .into_iter()
            .map(|(native_field, foreign_field)| ForeignKeyMapping::new(native_field, foreign_field))
            .collect();
        if mappings.is_empty() {
            return Err(fk_error(format!(
                "{native_table} -> {foreign_table} maps no fields"
            )));
        }
        let mut native_seen = BTreeSet::new();
        let mut foreign_seen = BTreeSet::new();
        for mapping in &mappings {
            if !native.has_field(&mapping.native_field) {
                return Err(fk_error(format!(
                    "{} is not a field of {native_table}",
                    mapping.native_field
                )));
            }
            if !foreign.primary_key.contains(&mapping.foreign_field) {
                return Err(fk_error(format!(
                    "{} is not a primary key field of {foreign_table}",
                    mapping.foreign_field
                )));
            }
            if !native_seen.insert(mapping.native_field.as_str())
                || !foreign_seen.insert(mapping.foreign_field.as_str())
            {
                return Err(fk_error(format!(
                    "{native_table} -> {foreign_table} repeats a field"
                )));
            }
        }
        let cardinality = if foreign_seen.len() == foreign.primary_key.len() {
            Cardinality::ManyToOne
        } else {
            Cardinality::ManyToMany
        };
        let mut sorted = mappings.clone();
        sorted.sort();
        let duplicate = self.foreign_keys.iter().any(|existing| {
            let mut other = existing.mappings.clone();
            other.sort();
            existing.native_table == native_table
                && existing.foreign_table == foreign_table
                && other == sorted
        });
        if duplicate {
            return Err(fk_error(format!(
                "{native_table} -> {foreign_table} is already declared"
            )));
        }
        self.foreign_keys.push(ForeignKey {
            native_table: native_table.to_string(),
            foreign_table: foreign_table.to_string(),
            mappings,
            cardinality,
        });
        Ok(())
    }

    /// Attach a named row predicate. Names are unique per table.
    pub fn add_data_row_predicate(&mut self, table: &str, name: &str, predicate: RowPredicate) -> Result<()> {
        self.table(table)?;
        let entries = self.predicates.entry(table.to_string()).or_default();
        if entries.iter().any(|entry| entry.name == name) {
            return Err(TicDatError::DuplicatePredicate {
                table: table.to_string(),
                name: name.to_string(),
            });
        }
        entries.push(NamedPredicate {
            name: name.to_string(),
            predicate,
        });
        Ok(())
    }

    /// Declare a parameter stored in the `parameters` table.
    pub fn add_parameter(
        &mut self,
        name: &str,
        default: impl Into<Value>,
        constraint: Option<TypeConstraint>,
    ) -> Result<()> {
        let default = default.into();
        let table = self.table(PARAMETERS_TABLE).map_err(|_| {
            TicDatError::InvalidParameter(format!(
                "parameters need a {PARAMETERS_TABLE} table"
            ))
        })?;
        if table.primary_key.len() != 1 || table.data_fields != [PARAMETER_VALUE_FIELD] {
            return Err(TicDatError::InvalidParameter(format!(
                "{PARAMETERS_TABLE} must have a single primary key field and the single data field {PARAMETER_VALUE_FIELD}"
            )));
        }
        if name.trim().is_empty() {
            return Err(TicDatError::InvalidParameter(
                "parameter names cannot be empty".to_string(),
            ));
        }
        if self.parameters.iter().any(|parameter| parameter.name == name) {
            return Err(TicDatError::InvalidParameter(format!(
                "{name} is declared twice"
            )));
        }
        if !default.is_acceptable_default() {
            return Err(TicDatError::InvalidParameter(format!(
                "default for {name} must be numeric, string or null"
            )));
        }
        if let Some(constraint) = &constraint
            && !constraint.valid(&default)
        {
            return Err(TicDatError::InvalidParameter(format!(
                "default {default} violates the data type of {name}"
            )));
        }
        self.parameters.push(Parameter {
            name: name.to_string(),
            default,
            constraint,
        });
        Ok(())
    }

    /// Finish the declaration.
    pub fn build(mut self) -> Result<Schema> {
        if !self.parameters.is_empty() {
            let parameters = Arc::new(self.parameters.clone());
            self.add_data_row_predicate(
                PARAMETERS_TABLE,
                PARAMETER_PREDICATE,
                parameter_predicate(parameters),
            )?;
        }
        let mut tables = Vec::with_capacity(self.tables.len());
        let mut index = HashMap::new();
        for decl in self.tables {
            let defaults = decl
                .data_fields
                .iter()
                .map(|field| decl.defaults.get(field).cloned().unwrap_or(Value::Number(0.0)))
                .collect();
            let layout = Arc::new(RowLayout::new(&decl.name, &decl.data_fields, defaults));
            index.insert(decl.name.clone(), tables.len());
            tables.push(TableSchema {
                name: decl.name,
                primary_key: Arc::new(decl.primary_key),
                layout,
            });
        }
        Ok(Schema {
            tables,
            index,
            data_types: self.data_types,
            foreign_keys: self.foreign_keys,
            predicates: self.predicates,
            parameters: self.parameters,
        })
    }
}

fn parameter_predicate(parameters: Arc<Vec<Parameter>>) -> RowPredicate {
    RowPredicate::with_message(move |row: &RowView<'_>, _| {
        let Some(name) = row.key().and_then(|key| key.values().first()) else {
            return Err("parameter row has no name".to_string());
        };
        let Some(parameter) = parameters
            .iter()
            .find(|parameter| name.as_str() == Some(parameter.name.as_str()))
        else {
            return Err(format!("{name} is not a declared parameter"));
        };
        let value = row.get(PARAMETER_VALUE_FIELD).map_err(|err| err.to_string())?;
        match &parameter.constraint {
            Some(constraint) if !constraint.valid(value) => Err(format!(
                "{value} is not a valid value for parameter {name}"
            )),
            _ => Ok(()),
        }
    })
}

/// A finished table declaration.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    primary_key: Arc<Vec<String>>,
    layout: Arc<RowLayout>,
}

impl TableSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn data_fields(&self) -> &[String] {
        self.layout.fields()
    }

    /// Primary-key fields followed by data fields.
    pub fn all_fields(&self) -> Vec<&str> {
        self.primary_key
            .iter()
            .chain(self.layout.fields())
            .map(String::as_str)
            .collect()
    }

    pub fn is_keyed(&self) -> bool {
        !self.primary_key.is_empty()
    }

    pub fn layout(&self) -> &Arc<RowLayout> {
        &self.layout
    }

    pub(crate) fn shared_primary_key(&self) -> &Arc<Vec<String>> {
        &self.primary_key
    }

    /// Split a bulk row (primary-key and data values) into its key and data part.
    pub fn split_row(&self, input: RowInput) -> Result<(Key, RowInput)> {
        let key_len = self.primary_key.len();
        match input {
            RowInput::Mapping(mut mapping) => {
                let mut key = Vec::with_capacity(key_len);
                for field in self.primary_key.iter() {
                    let value = mapping.remove(field).ok_or_else(|| TicDatError::MissingKeyField {
                        table: self.name.clone(),
                        field: field.clone(),
                    })?;
                    key.push(value);
                }
                Ok((Key::new(key), RowInput::Mapping(mapping)))
            }
            RowInput::Sequence(mut values) => {
                let expected = key_len + self.layout.len();
                if values.len() != expected {
                    return Err(TicDatError::RowArity {
                        table: self.name.clone(),
                        expected,
                        found: values.len(),
                    });
                }
                let data = values.split_off(key_len);
                Ok((Key::new(values), RowInput::Sequence(data)))
            }
            RowInput::Scalar(value) => {
                if key_len != 1 || !self.layout.is_empty() {
                    return Err(TicDatError::RowArity {
                        table: self.name.clone(),
                        expected: key_len + self.layout.len(),
                        found: 1,
                    });
                }
                Ok((Key::new(vec![value]), RowInput::empty()))
            }
        }
    }
}

/// Immutable schema definition.
#[derive(Debug, Clone)]
pub struct Schema {
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
    data_types: BTreeMap<(String, String), TypeConstraint>,
    foreign_keys: Vec<ForeignKey>,
    predicates: HashMap<String, Vec<NamedPredicate>>,
    parameters: Vec<Parameter>,
}

impl Schema {
    /// Tables in declaration order.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(TableSchema::name)
    }

    pub fn table(&self, name: &str) -> Result<&TableSchema> {
        self.index
            .get(name)
            .map(|idx| &self.tables[*idx])
            .ok_or_else(|| TicDatError::UnknownTable {
                table: name.to_string(),
            })
    }

    pub fn primary_key_fields(&self, table: &str) -> Result<&[String]> {
        Ok(self.table(table)?.primary_key())
    }

    pub fn data_fields(&self, table: &str) -> Result<&[String]> {
        Ok(self.table(table)?.data_fields())
    }

    pub fn default_value(&self, table: &str, field: &str) -> Result<&Value> {
        self.table(table)?
            .layout()
            .default_value(field)
            .ok_or_else(|| TicDatError::UnknownField {
                table: table.to_string(),
                field: field.to_string(),
            })
    }

    pub fn data_type(&self, table: &str, field: &str) -> Option<&TypeConstraint> {
        self.data_types.get(&(table.to_string(), field.to_string()))
    }

    /// Every declared constraint as `(table, field, constraint)`.
    pub fn data_types(&self) -> impl Iterator<Item = (&str, &str, &TypeConstraint)> {
        self.data_types
            .iter()
            .map(|((table, field), constraint)| (table.as_str(), field.as_str(), constraint))
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Predicates of one table in registration order.
    pub fn data_row_predicates(&self, table: &str) -> &[NamedPredicate] {
        self.predicates.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// An empty, mutable data set for this schema.
    pub fn tic_dat(&self) -> TicDat {
        TicDat::new(self)
    }

    /// Whether the data set was built from this schema's layouts.
    pub fn good_tic_dat(&self, data: &dyn DataSet) -> bool {
        self.tables.iter().all(|table| {
            data.table(table.name()).is_ok_and(|found| {
                found.primary_key() == table.primary_key() && **found.layout() == **table.layout()
            })
        }) && data.table_names().len() == self.tables.len()
    }

    /// Resolve every declared parameter to its supplied value, if present and
    /// valid, or its default.
    pub fn create_full_parameters_dict(&self, data: &dyn DataSet) -> BTreeMap<String, Value> {
        let supplied = data.table(PARAMETERS_TABLE).ok();
        self.parameters
            .iter()
            .map(|parameter| {
                let value = supplied
                    .and_then(|table| table.get(&Key::from(parameter.name.as_str())))
                    .and_then(|row| row.get(PARAMETER_VALUE_FIELD).ok())
                    .filter(|value| {
                        parameter
                            .constraint
                            .as_ref()
                            .is_none_or(|constraint| constraint.valid(value))
                    })
                    .cloned()
                    .unwrap_or_else(|| parameter.default.clone());
                (parameter.name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diet() -> SchemaBuilder {
        let mut builder = SchemaBuilder::new();
        builder
            .add_table("categories", ["Name"], ["Min Nutrition", "Max Nutrition"])
            .expect("categories");
        builder.add_table("foods", ["Name"], ["Cost"]).expect("foods");
        builder
            .add_table("nutrition_quantities", ["Food", "Category"], ["Quantity"])
            .expect("nutrition_quantities");
        builder
    }

    #[test]
    fn rejects_field_collisions() {
        let mut builder = SchemaBuilder::new();
        let err = builder
            .add_table("t", ["a"], ["a"])
            .expect_err("pk and data overlap");
        assert!(matches!(err, TicDatError::InvalidSchema(_)));
        builder.add_table("t", ["a"], ["b"]).expect("first table");
        assert!(builder.add_table("t", ["x"], Vec::<String>::new()).is_err());
    }

    #[test]
    fn rejects_names_differing_only_in_case_or_spaces() {
        let mut builder = SchemaBuilder::new();
        let err = builder
            .add_table("t", ["Name"], ["Min Cost", "min_cost"])
            .expect_err("fields collide");
        assert_eq!(
            err.to_string(),
            "invalid schema: fields Min Cost and min_cost of table t differ only in case or spaces"
        );
        assert!(builder.add_table("t", ["Name"], ["NAME"]).is_err());

        builder
            .add_table("nutrition_quantities", ["Food"], ["Quantity"])
            .expect("table");
        let err = builder
            .add_table("Nutrition Quantities", ["Food"], ["Quantity"])
            .expect_err("tables collide");
        assert!(matches!(err, TicDatError::InvalidSchema(_)));
        assert_eq!(normalized_name(" Min Nutrition "), "min_nutrition");
    }

    #[test]
    fn defaults_must_match_data_types() {
        let mut builder = diet();
        builder
            .set_data_type(
                "foods",
                "Cost",
                TypeConstraint::builder().build().expect("constraint"),
            )
            .expect("set data type");
        let err = builder
            .set_default_value("foods", "Cost", -1.0)
            .expect_err("negative default");
        assert!(matches!(err, TicDatError::InvalidDefault { .. }));
        assert!(builder.set_default_value("foods", "Cost", true).is_err());
        assert!(builder.set_default_value("foods", "Name", 1.0).is_err());
        builder
            .set_default_value("foods", "Cost", 3.0)
            .expect("valid default");

        let schema = builder.build().expect("build");
        assert_eq!(schema.default_value("foods", "Cost"), Ok(&Value::from(3.0)));
        assert_eq!(
            schema.default_value("categories", "Max Nutrition"),
            Ok(&Value::from(0.0))
        );
    }

    #[test]
    fn data_type_rechecks_existing_default() {
        let mut builder = diet();
        builder
            .set_default_value("categories", "Max Nutrition", f64::INFINITY)
            .expect("default");
        let err = builder
            .set_data_type(
                "categories",
                "Max Nutrition",
                TypeConstraint::builder().build().expect("constraint"),
            )
            .expect_err("exclusive infinity");
        assert!(matches!(err, TicDatError::InvalidDefault { .. }));
    }

    #[test]
    fn foreign_key_declarations() {
        let mut builder = diet();
        builder
            .add_foreign_key("nutrition_quantities", "foods", [("Food", "Name")])
            .expect("fk");
        assert!(
            builder
                .add_foreign_key("nutrition_quantities", "foods", [("Food", "Name")])
                .is_err()
        );
        assert!(
            builder
                .add_foreign_key("nutrition_quantities", "foods", [("Food", "Cost")])
                .is_err()
        );
        assert!(
            builder
                .add_foreign_key("nutrition_quantities", "nowhere", [("Food", "Name")])
                .is_err()
        );
        assert!(
            builder
                .add_foreign_key("nutrition_quantities", "foods", [("Nope", "Name")])
                .is_err()
        );
        let schema = builder.build().expect("build");
        assert_eq!(schema.foreign_keys().len(), 1);
        assert_eq!(schema.foreign_keys()[0].cardinality, Cardinality::ManyToOne);
    }

    #[test]
    fn partial_foreign_key_is_many_to_many() {
        let mut builder = diet();
        builder
            .add_table("food_groups", ["Food"], ["Group"])
            .expect("table");
        builder
            .add_foreign_key("food_groups", "nutrition_quantities", [("Food", "Food")])
            .expect("fk");
        let schema = builder.build().expect("build");
        assert_eq!(schema.foreign_keys()[0].cardinality, Cardinality::ManyToMany);
    }

    #[test]
    fn predicate_names_unique_per_table() {
        let mut builder = diet();
        let always = RowPredicate::boolean(|_, _| true);
        builder
            .add_data_row_predicate("foods", "check", always.clone())
            .expect("first");
        let err = builder
            .add_data_row_predicate("foods", "check", always.clone())
            .expect_err("duplicate");
        assert!(matches!(err, TicDatError::DuplicatePredicate { .. }));
        builder
            .add_data_row_predicate("categories", "check", always)
            .expect("other table");
    }

    #[test]
    fn parameters_require_parameters_table() {
        let mut builder = diet();
        assert!(matches!(
            builder.add_parameter("Factor", 1.0, None),
            Err(TicDatError::InvalidParameter(_))
        ));
        builder
            .add_table(PARAMETERS_TABLE, ["Name"], [PARAMETER_VALUE_FIELD])
            .expect("parameters");
        builder.add_parameter("Factor", 1.0, None).expect("param");
        assert!(builder.add_parameter("Factor", 2.0, None).is_err());
        let constraint = TypeConstraint::builder().min(0.0).build().expect("constraint");
        assert!(builder.add_parameter("Bad", -1.0, Some(constraint)).is_err());

        let schema = builder.build().expect("build");
        assert_eq!(
            schema.data_row_predicates(PARAMETERS_TABLE)[0].name,
            PARAMETER_PREDICATE
        );
    }

    #[test]
    fn split_bulk_rows() {
        let schema = diet().build().expect("build");
        let table = schema.table("nutrition_quantities").expect("table");
        let (key, data) = table
            .split_row(vec![Value::text("pizza"), Value::text("fat"), Value::from(12.0)].into())
            .expect("split");
        assert_eq!(key, Key::from(("pizza", "fat")));
        assert_eq!(data, RowInput::Sequence(vec![Value::from(12.0)]));

        let err = table
            .split_row(RowInput::from([("Food", "pizza")]))
            .expect_err("missing Category");
        assert!(matches!(err, TicDatError::MissingKeyField { field, .. } if field == "Category"));
    }
}
