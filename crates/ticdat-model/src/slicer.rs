//! Wildcard lookup over a list of fixed-width tuples.

use std::collections::HashMap;

use crate::error::{Result, TicDatError};
use crate::value::Value;

/// Pattern element matching every value.
pub const WILDCARD: &str = "*";

fn is_wildcard(value: &Value) -> bool {
    value.as_str() == Some(WILDCARD)
}

type Groups = HashMap<Vec<Value>, Vec<usize>>;

/// Multi-index slicer.
///
/// Each distinct set of wildcard positions builds one grouping of the
/// indexed tuples on first use; later queries with the same shape are a
/// single hash lookup. [`Slicer::clear`] drops every cached grouping.
#[derive(Debug, Clone, Default)]
pub struct Slicer {
    tuples: Vec<Vec<Value>>,
    cache: HashMap<Vec<usize>, Groups>,
}

impl Slicer {
    /// Index `tuples`. All tuples must share one width and none may contain
    /// the wildcard marker.
    pub fn new<I, T>(tuples: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator,
        T::Item: Into<Value>,
    {
        let tuples: Vec<Vec<Value>> = tuples
            .into_iter()
            .map(|tuple| tuple.into_iter().map(Into::into).collect())
            .collect();
        if let Some(first) = tuples.first()
            && tuples.iter().any(|tuple| tuple.len() != first.len())
        {
            return Err(TicDatError::Slicer(
                "each tuple needs to have the same number of elements".to_string(),
            ));
        }
        if tuples.iter().flatten().any(is_wildcard) {
            return Err(TicDatError::Slicer(format!(
                "the {WILDCARD} marker cannot itself be used as an index"
            )));
        }
        Ok(Self {
            tuples,
            cache: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Every indexed tuple matching `pattern`, in index order.
    pub fn slice(&mut self, pattern: &[Value]) -> Result<Vec<Vec<Value>>> {
        let Some(first) = self.tuples.first() else {
            return Ok(Vec::new());
        };
        if pattern.len() != first.len() {
            return Err(TicDatError::Slicer(format!(
                "pattern has {} elements, indexed tuples have {}",
                pattern.len(),
                first.len()
            )));
        }
        let wildcards: Vec<usize> = pattern
            .iter()
            .enumerate()
            .filter(|(_, value)| is_wildcard(value))
            .map(|(idx, _)| idx)
            .collect();
        let fixed = |tuple: &[Value]| -> Vec<Value> {
            tuple
                .iter()
                .enumerate()
                .filter(|(idx, _)| !wildcards.contains(idx))
                .map(|(_, value)| value.clone())
                .collect()
        };
        let tuples = &self.tuples;
        let groups = self.cache.entry(wildcards.clone()).or_insert_with(|| {
            let mut groups = Groups::new();
            for (idx, tuple) in tuples.iter().enumerate() {
                groups.entry(fixed(tuple)).or_default().push(idx);
            }
            groups
        });
        Ok(groups
            .get(&fixed(pattern))
            .map(|members| members.iter().map(|idx| tuples[*idx].clone()).collect())
            .unwrap_or_default())
    }

    /// Drop cached groupings.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcs() -> Slicer {
        Slicer::new(vec![
            vec![Value::text("Detroit"), Value::text("Boston")],
            vec![Value::text("Detroit"), Value::text("New York")],
            vec![Value::text("Denver"), Value::text("Boston")],
        ])
        .expect("slicer")
    }

    #[test]
    fn slices_by_fixed_positions() {
        let mut slicer = arcs();
        let leaving = slicer
            .slice(&[Value::text("Detroit"), Value::text(WILDCARD)])
            .expect("slice");
        assert_eq!(leaving.len(), 2);
        let entering = slicer
            .slice(&[Value::text(WILDCARD), Value::text("Boston")])
            .expect("slice");
        assert_eq!(entering.len(), 2);
        let exact = slicer
            .slice(&[Value::text("Denver"), Value::text("New York")])
            .expect("slice");
        assert!(exact.is_empty());
        let all = slicer
            .slice(&[Value::text(WILDCARD), Value::text(WILDCARD)])
            .expect("slice");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn clear_keeps_results() {
        let mut slicer = arcs();
        let pattern = [Value::text("Detroit"), Value::text(WILDCARD)];
        let before = slicer.slice(&pattern).expect("slice");
        slicer.clear();
        assert_eq!(slicer.slice(&pattern).expect("slice"), before);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Slicer::new(vec![vec![Value::from(1.0)], vec![Value::from(1.0), Value::from(2.0)]]).is_err());
        assert!(Slicer::new(vec![vec![Value::text(WILDCARD)]]).is_err());
        let mut slicer = arcs();
        assert!(slicer.slice(&[Value::text("Detroit")]).is_err());
    }

    #[test]
    fn empty_slicer_matches_nothing() {
        let mut slicer = Slicer::new(Vec::<Vec<Value>>::new()).expect("slicer");
        assert!(slicer.is_empty());
        assert!(slicer.slice(&[Value::from(1.0)]).expect("slice").is_empty());
    }
}
