//! Case-insensitive header storage
//!
//! Both transport bindings define header names as case-insensitive, so every
//! key operation here folds the name before touching the map. Callers never
//! normalize names themselves.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// A header value together with the spelling it was first inserted under
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    value: String,
}

/// Header name to value mapping with case-insensitive keys
///
/// Inserting `"Authorization"` and reading `"authorization"` yields the same
/// value. When two spellings of one name are inserted, the later value wins
/// and the first spelling is kept for iteration. Iteration is ordered by the
/// folded name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: BTreeMap<String, HeaderEntry>,
}

/// Fold a header name for comparison.
///
/// Header names are RFC 7230 tokens, which are ASCII.
fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl HeaderBag {
    /// Create an empty header bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, returning the previous value stored under any
    /// spelling of the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.entry(fold(&name)) {
            btree_map::Entry::Occupied(mut slot) => {
                Some(std::mem::replace(&mut slot.get_mut().value, value))
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(HeaderEntry { name, value });
                None
            }
        }
    }

    /// Look up a header value, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&fold(name)).map(|e| e.value.as_str())
    }

    /// Check whether a header is present, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold(name))
    }

    /// Remove a header, ignoring case
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&fold(name)).map(|e| e.value)
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag holds no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.name.as_str(), e.value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = HeaderBag::new();
        bag.extend(iter);
        bag
    }
}

impl<K, V> Extend<(K, V)> for HeaderBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl fmt::Display for HeaderBag {
    /// Lists header names only; values may hold credentials.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|(name, _)| name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
