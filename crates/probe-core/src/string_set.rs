//! Ordered set of string identifiers.

use crate::semilattice::{Bottom, Commutative, CvState, JoinSemilattice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of string identifiers with copy-on-write growth.
///
/// Membership only; entries carry no payload. Ordering is lexicographic, which
/// makes two sets comparable and gives deterministic iteration and encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringSet(BTreeSet<String>);

impl StringSet {
    /// Empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns a new set holding every entry of `self` plus `ids`.
    pub fn add<I, S>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = self.clone();
        result.0.extend(ids.into_iter().map(Into::into));
        result
    }

    /// Union of `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        self.add(other.iter().cloned())
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifiers in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &String> + '_ {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl JoinSemilattice for StringSet {
    fn join(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Bottom for StringSet {
    fn bottom() -> Self {
        Self::new()
    }
}

impl CvState for StringSet {}

impl Commutative for StringSet {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_set() -> impl Strategy<Value = StringSet> {
        prop::collection::vec("[a-d]", 0..4).prop_map(|ids| ids.into_iter().collect::<StringSet>())
    }

    proptest! {
        #[test]
        fn join_is_a_semilattice(a in arbitrary_set(), b in arbitrary_set(), c in arbitrary_set()) {
            prop_assert_eq!(a.join(&a), a.clone());
            prop_assert_eq!(a.join(&b), b.join(&a));
            prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        }
    }

    #[test]
    fn test_add_does_not_touch_receiver() {
        let base: StringSet = ["a"].into_iter().collect();
        let grown = base.add(["b", "c"]);

        assert_eq!(base.len(), 1);
        assert_eq!(grown.len(), 3);
        assert!(grown.contains("a"));
        assert!(grown.contains("c"));
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let base: StringSet = ["a", "b"].into_iter().collect();
        assert_eq!(base.add(["a"]), base);
    }

    #[test]
    fn test_merge_is_union() {
        let a: StringSet = ["x", "y"].into_iter().collect();
        let b: StringSet = ["y", "z"].into_iter().collect();
        let merged = a.join(&b);

        let ids: Vec<&str> = merged.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a: StringSet = ["a", "b"].into_iter().collect();
        let b: StringSet = ["a", "c"].into_iter().collect();
        assert!(a < b);
        assert!(StringSet::new() < a);
    }

    #[test]
    fn test_serializes_as_array() {
        let set: StringSet = ["stop", "restart"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["restart","stop"]"#);

        let decoded: StringSet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, set);
    }
}
