//! Per-test property storage.
//!
//! A [`PropertyBag`] maps property names to string values in insertion order. Recognized CTest property
//! names (see [`ctestkit_core::properties`]) match case-insensitively and are stored under their canonical
//! upper-case spelling; any other name is stored and matched exactly as given, because CTest accepts
//! arbitrary test properties.
//!
//! ## Notes
//! - Values are always strings. List-valued properties (`ENVIRONMENT`, `LABELS`, `DEPENDS`, ...) hold
//!   `;`-joined text; callers join, the bag does not parse list syntax.

use std::fmt;

use ctestkit_core::{join_list, properties, truthy};
use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{CtestError, CtestResult};

/// Ordered, string-valued test properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: Vec<(String, String)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        let key = properties::canonical_name(key);
        self.entries.iter().position(|(k, _)| *k == key)
    }

    /// Set `key` to `value`, overwriting any existing value in place.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let value = value.into();
        match self.position(key.as_ref()) {
            Some(idx) => self.entries[idx].1 = value,
            None => self
                .entries
                .push((properties::canonical_name(key.as_ref()), value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a list-valued property from individual items.
    pub fn set_list<I, S>(&mut self, key: impl AsRef<str>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set(key, join_list(items));
    }

    /// Append one item to a `;`-joined value, creating it if absent.
    pub fn append(&mut self, key: impl AsRef<str>, item: impl AsRef<str>) {
        match self.position(key.as_ref()) {
            Some(idx) => {
                let value = &mut self.entries[idx].1;
                if !value.is_empty() {
                    value.push(';');
                }
                value.push_str(item.as_ref());
            }
            None => self.set(key, item.as_ref()),
        }
    }

    /// Look up a property value.
    ///
    /// ## Errors
    /// [`CtestError::KeyNotFound`] when the property is not set.
    pub fn get(&self, key: &str) -> CtestResult<&str> {
        self.position(key)
            .map(|idx| self.entries[idx].1.as_str())
            .ok_or_else(|| CtestError::KeyNotFound {
                key: properties::canonical_name(key),
            })
    }

    /// Look up a property and interpret it as a CMake boolean.
    pub fn get_bool(&self, key: &str) -> CtestResult<bool> {
        self.get(key).map(truthy)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Overwrite overlapping keys from `other`; keys only in `other` are appended in its order.
    pub fn merge(&mut self, other: &PropertyBag) {
        for (key, value) in &other.entries {
            self.set(key, value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every property can be written out.
    ///
    /// ## Errors
    /// [`CtestError::Validation`] naming `test` when a property name is empty.
    pub fn validate(&self, test: &str) -> CtestResult<()> {
        if self.entries.iter().any(|(k, _)| k.is_empty()) {
            return Err(CtestError::validation(format!(
                "test '{test}' has a property with an empty name"
            )));
        }
        Ok(())
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyBag
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bag = PropertyBag::new();
        for (k, v) in iter {
            bag.set(k, v);
        }
        bag
    }
}

/// A manifest property value before it is flattened to a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Flag(bool),
    Number(serde_json::Number),
    List(Vec<String>),
}

impl RawValue {
    fn into_string(self) -> String {
        match self {
            RawValue::Text(s) => s,
            RawValue::Flag(true) => "ON".to_string(),
            RawValue::Flag(false) => "OFF".to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::List(items) => join_list(items),
        }
    }
}

struct BagVisitor;

impl<'de> Visitor<'de> for BagVisitor {
    type Value = PropertyBag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of property names to strings, numbers, booleans, or string lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PropertyBag, A::Error> {
        let mut bag = PropertyBag::new();
        while let Some((key, value)) = map.next_entry::<String, RawValue>()? {
            if matches!(value, RawValue::List(_))
                && properties::from_str(&key).is_some()
                && !properties::is_list(&key)
            {
                return Err(A::Error::custom(format!(
                    "property '{}' takes a single value, not a list",
                    properties::canonical_name(&key)
                )));
            }
            bag.set(key, value.into_string());
        }
        Ok(bag)
    }
}

// Deserialized by hand so document order survives (serde_json's Map would sort keys).
impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BagVisitor)
    }
}
