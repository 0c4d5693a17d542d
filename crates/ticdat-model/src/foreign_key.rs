//! Foreign key rules between tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// One native field paired with the foreign primary-key field it references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ForeignKeyMapping {
    pub native_field: String,
    pub foreign_field: String,
}

impl ForeignKeyMapping {
    pub fn new(native_field: impl Into<String>, foreign_field: impl Into<String>) -> Self {
        Self {
            native_field: native_field.into(),
            foreign_field: foreign_field.into(),
        }
    }
}

/// How many parent rows a child row may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// The mapping covers the full foreign primary key.
    ManyToOne,
    /// The mapping covers part of the foreign primary key.
    ManyToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cardinality::ManyToOne => "many-to-one",
            Cardinality::ManyToMany => "many-to-many",
        })
    }
}

/// A reference from fields of a native (child) table to primary-key fields of
/// a foreign (parent) table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ForeignKey {
    pub native_table: String,
    pub foreign_table: String,
    pub mappings: Vec<ForeignKeyMapping>,
    pub cardinality: Cardinality,
}

impl ForeignKey {
    /// Whether the key maps a single field.
    pub fn is_simple(&self) -> bool {
        self.mappings.len() == 1
    }

    /// Native fields in mapping order.
    pub fn native_fields(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .map(|mapping| mapping.native_field.as_str())
            .collect()
    }

    /// Foreign fields in mapping order.
    pub fn foreign_fields(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .map(|mapping| mapping.foreign_field.as_str())
            .collect()
    }

    pub fn native_to_foreign(&self) -> BTreeMap<&str, &str> {
        self.mappings
            .iter()
            .map(|mapping| (mapping.native_field.as_str(), mapping.foreign_field.as_str()))
            .collect()
    }

    pub fn foreign_to_native(&self) -> BTreeMap<&str, &str> {
        self.mappings
            .iter()
            .map(|mapping| (mapping.foreign_field.as_str(), mapping.native_field.as_str()))
            .collect()
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.native_table)?;
        write!(f, "{}", self.native_fields().join(", "))?;
        write!(f, ") -> {}(", self.foreign_table)?;
        write!(f, "{}", self.foreign_fields().join(", "))?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound() -> ForeignKey {
        ForeignKey {
            native_table: "cost".to_string(),
            foreign_table: "arcs".to_string(),
            mappings: vec![
                ForeignKeyMapping::new("Source", "Source"),
                ForeignKeyMapping::new("Destination", "Destination"),
            ],
            cardinality: Cardinality::ManyToOne,
        }
    }

    #[test]
    fn field_views() {
        let fk = compound();
        assert!(!fk.is_simple());
        assert_eq!(fk.native_fields(), vec!["Source", "Destination"]);
        assert_eq!(fk.native_to_foreign().get("Destination"), Some(&"Destination"));
        assert_eq!(
            fk.to_string(),
            "cost(Source, Destination) -> arcs(Source, Destination)"
        );
    }

    #[test]
    fn mapping_directions() {
        let fk = ForeignKey {
            native_table: "nutrition_quantities".to_string(),
            foreign_table: "foods".to_string(),
            mappings: vec![ForeignKeyMapping::new("Food", "Name")],
            cardinality: Cardinality::ManyToOne,
        };
        assert!(fk.is_simple());
        assert_eq!(fk.foreign_to_native().get("Name"), Some(&"Food"));
        assert_eq!(fk.native_to_foreign().get("Food"), Some(&"Name"));
    }

    #[test]
    fn cardinality_labels_match_serialized_form() {
        for cardinality in [Cardinality::ManyToOne, Cardinality::ManyToMany] {
            let json = serde_json::to_value(cardinality).expect("serialize");
            assert_eq!(json.as_str(), Some(cardinality.to_string().as_str()));
        }
        assert_eq!(Cardinality::ManyToMany.to_string(), "many-to-many");
    }
}
