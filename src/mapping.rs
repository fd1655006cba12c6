//! The canonical `{benchmark name -> value}` mapping and its on-disk
//! baseline snapshot.

use std::{
    collections::{BTreeMap, btree_map},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{BenchTrackError, name};

/// Normalized benchmark results, independent of the source format.
///
/// Keys are kept sorted so every consumer iterates in the same order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMapping {
    entries: BTreeMap<String, f64>,
}

impl CanonicalMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.entries.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries whose variant passes `keep`, in name order.
    pub fn filter_variants<F>(&self, mut keep: F) -> impl Iterator<Item = (&str, f64)>
    where
        F: FnMut(&str) -> bool,
    {
        self.iter()
            .filter(move |(name, _)| keep(name::decompose(name).variant()))
    }
}

impl FromIterator<(String, f64)> for CanonicalMapping {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CanonicalMapping {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Loads a snapshot previously written by [`write_snapshot`].
///
/// An absent file is a missing required input, not an empty mapping.
pub fn load_snapshot(path: &Path) -> Result<CanonicalMapping, BenchTrackError> {
    if !path.exists() {
        return Err(BenchTrackError::missing_input(format!(
            "baseline snapshot {} not found",
            path.display()
        )));
    }
    let data = fs::read(path).map_err(|e| BenchTrackError::io(e.to_string()))?;
    serde_json::from_slice(&data)
        .map_err(|e| BenchTrackError::parse(format!("{}: {e}", path.display())))
}

/// Serializes the full, unfiltered mapping without rounding.
pub fn snapshot_json(mapping: &CanonicalMapping) -> Result<String, BenchTrackError> {
    serde_json::to_string_pretty(mapping).map_err(|e| BenchTrackError::render(e.to_string()))
}

pub fn write_snapshot(mapping: &CanonicalMapping, path: &Path) -> Result<(), BenchTrackError> {
    let data = snapshot_json(mapping)?;
    fs::write(path, data).map_err(|e| BenchTrackError::io(e.to_string()))
}

/// Separates runs recorded under a suffixed variant (`bench/rt_std_base`)
/// from the current runs. Returns `(base, head)`; base names have the
/// suffix stripped so they line up with their head counterparts.
pub fn split_base_suffix(
    mapping: &CanonicalMapping,
    suffix: &str,
) -> (CanonicalMapping, CanonicalMapping) {
    let mut base = CanonicalMapping::new();
    let mut head = CanonicalMapping::new();
    for (full, value) in mapping.iter() {
        let parsed = name::decompose(full);
        match parsed.variant().strip_suffix(suffix) {
            Some(stripped) if !suffix.is_empty() && !parsed.is_single_segment() => {
                base.insert(
                    name::join(parsed.group(), stripped, parsed.parameter()),
                    value,
                );
            }
            _ => {
                head.insert(full, value);
            }
        }
    }
    (base, head)
}
