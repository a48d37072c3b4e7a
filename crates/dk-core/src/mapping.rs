//! Declared link mapping
//!
//! A [`LinkMapping`] is the ordered set of `source -> target` pairs read from
//! configuration. Source paths are unique and declaration order is kept,
//! because it decides the order in which links are repaired.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// One declared link: where the symlink lives and what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Location of the symlink
    pub source: String,
    /// Location the symlink should point to
    pub target: String,
}

impl LinkEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ordered mapping of source paths to target paths with unique sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMapping {
    entries: Vec<LinkEntry>,
}

impl LinkMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from pairs, rejecting duplicate sources.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut mapping = Self::new();
        for (source, target) in pairs {
            mapping.insert(source, target)?;
        }
        Ok(mapping)
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] if `source` is already declared.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> Result<()> {
        let source = source.into();
        if self.get(&source).is_some() {
            return Err(Error::config_invalid(format!(
                "link source declared more than once: {}",
                source
            )));
        }
        self.entries.push(LinkEntry::new(source, target));
        Ok(())
    }

    /// Target declared for `source`, if any
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.target.as_str())
    }

    /// Entries in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, LinkEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a LinkMapping {
    type Item = &'a LinkEntry;
    type IntoIter = std::slice::Iter<'a, LinkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for LinkMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.source, &entry.target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LinkMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = LinkMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of link source paths to target paths")
            }

            fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<LinkMapping, E> {
                Ok(LinkMapping::new())
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<LinkMapping, A::Error> {
                let mut mapping = LinkMapping::new();
                while let Some((source, target)) = access.next_entry::<String, String>()? {
                    mapping
                        .insert(source, target)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_any(MappingVisitor)
    }
}
