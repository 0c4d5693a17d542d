//! Matching of table and field names found in files.
//!
//! Names match case-insensitively, with spaces in the file treated as
//! underscores.

use std::path::Path;

use ticdat_model::normalized_name;

use crate::error::{FormatError, Result};

/// Whether a name found in a file refers to `declared`.
pub fn matches(declared: &str, found: &str) -> bool {
    normalized_name(declared) == normalized_name(found)
}

/// The single candidate matching `table`, if any.
pub fn find_unique<'a, I>(table: &str, candidates: I, path: &Path) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found = candidates.into_iter().filter(|candidate| matches(table, candidate));
    let first = found.next();
    if first.is_some() && found.next().is_some() {
        return Err(FormatError::AmbiguousTable {
            path: path.to_path_buf(),
            table: table.to_string(),
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_space_insensitive() {
        assert!(matches("nutrition_quantities", "Nutrition Quantities"));
        assert!(matches("Min Nutrition", "min nutrition"));
        assert!(matches("Min Nutrition", "Min_Nutrition"));
        assert!(!matches("foods", "food"));
    }

    #[test]
    fn ambiguous_entries_fail() {
        let path = Path::new("data.json");
        let found = find_unique("foods", ["Foods", "categories"], path).expect("unique");
        assert_eq!(found, Some("Foods"));
        assert_eq!(find_unique("arcs", ["foods"], path).expect("none"), None);
        assert!(matches!(
            find_unique("foods", ["foods", "FOODS"], path),
            Err(FormatError::AmbiguousTable { .. })
        ));
    }
}
