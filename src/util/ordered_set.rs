//! Insertion-ordered, de-duplicated string sets.
//!
//! Every accumulated list on a unit (dependencies, include dirs, link
//! libraries) keeps first-seen order so that generated manifests and flag
//! lists are stable across runs.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

/// A set of strings that remembers the order in which values were first inserted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        OrderedSet::default()
    }

    /// Insert a value. Returns `true` if it was not already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    /// Insert every value from an iterator, keeping first-seen order.
    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(value);
        }
    }

    /// Remove a value. Returns `true` if it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        if !self.seen.remove(value) {
            return false;
        }
        self.items.retain(|item| item != value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}

impl fmt::Debug for OrderedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for OrderedSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl PartialEq<[&str]> for OrderedSet {
    fn eq(&self, other: &[&str]) -> bool {
        self.items.len() == other.len() && self.items.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for OrderedSet {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_seen_order() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        set.extend(["c", "a"]);

        assert_eq!(set, ["b", "a", "c"]);
    }

    #[test]
    fn test_remove() {
        let mut set: OrderedSet = ["x", "y", "z"].into_iter().collect();
        assert!(set.remove("y"));
        assert!(!set.remove("y"));
        assert!(!set.contains("y"));
        assert_eq!(set, ["x", "z"]);

        // Re-inserting after removal goes to the end
        set.insert("y");
        assert_eq!(set, ["x", "z", "y"]);
    }

    #[test]
    fn test_serializes_as_list() {
        let set: OrderedSet = ["one", "two"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["one","two"]"#);
    }
}
