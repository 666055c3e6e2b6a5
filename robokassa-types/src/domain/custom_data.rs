//! Merchant-defined metadata round-tripped through the gateway.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};

/// Opaque key/value metadata attached to a payment.
///
/// Iteration order is unspecified. Anything that feeds a signature must sort
/// the entries itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomData(HashMap<String, String>);

impl CustomData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Returns a copy with `prefix` prepended to every key.
    pub fn prefixed(&self, prefix: &str) -> CustomData {
        self.iter()
            .map(|(key, value)| (format!("{}{}", prefix, key), value.clone()))
            .collect()
    }

    /// Returns a copy with the first `prefix`-length characters cut from every key.
    ///
    /// Keys are expected to have been selected by a case-insensitive prefix
    /// match, so the cut is positional rather than a literal `strip_prefix`.
    pub fn without_prefix(&self, prefix: &str) -> CustomData {
        let skip = prefix.chars().count();
        self.iter()
            .map(|(key, value)| (key.chars().skip(skip).collect::<String>(), value.clone()))
            .collect()
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for CustomData {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a CustomData {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for CustomData {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
