//! Reshapes a flat mapping into `{group -> {parameter -> {variant -> value}}}`
//! for chart rendering.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{mapping::CanonicalMapping, name};

/// Ordering key for the parameter axis: unparameterized first, then
/// integer parameters by value, then everything else by text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKey {
    None,
    Numeric(i64, String),
    Text(String),
}

impl ParamKey {
    pub fn from_segment(segment: Option<&str>) -> Self {
        match segment {
            None => ParamKey::None,
            Some(text) => match text.parse::<i64>() {
                Ok(n) => ParamKey::Numeric(n, text.to_string()),
                Err(_) => ParamKey::Text(text.to_string()),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamKey::None => None,
            ParamKey::Numeric(_, text) | ParamKey::Text(text) => Some(text),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ParamKey::None)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("-"))
    }
}

pub type VariantValues = BTreeMap<String, f64>;
pub type ParamSeries = BTreeMap<ParamKey, VariantValues>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedSeries {
    groups: BTreeMap<String, ParamSeries>,
}

impl GroupedSeries {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &ParamSeries)> {
        self.groups.iter().map(|(g, s)| (g.as_str(), s))
    }

    pub fn group(&self, group: &str) -> Option<&ParamSeries> {
        self.groups.get(group)
    }

    pub fn value(&self, group: &str, param: &ParamKey, variant: &str) -> Option<f64> {
        self.groups.get(group)?.get(param)?.get(variant).copied()
    }
}

/// True when a group has at least one real parameter and so needs a
/// clustered chart.
pub fn is_parameterized(series: &ParamSeries) -> bool {
    series.keys().any(|k| !k.is_none())
}

/// Every variant appearing anywhere in the group.
pub fn variants_of(series: &ParamSeries) -> BTreeSet<&str> {
    series
        .values()
        .flat_map(|values| values.keys().map(String::as_str))
        .collect()
}

/// Orders `present` by `display_order`; variants missing from the order
/// follow alphabetically.
pub fn ordered_variants<'a, I>(present: I, display_order: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: BTreeSet<&str> = present.into_iter().collect();
    let mut ordered: Vec<String> = display_order
        .iter()
        .filter(|v| present.contains(v.as_str()))
        .cloned()
        .collect();
    let listed: BTreeSet<&str> = display_order.iter().map(String::as_str).collect();
    ordered.extend(
        present
            .into_iter()
            .filter(|v| !listed.contains(v))
            .map(str::to_string),
    );
    ordered
}

/// Groups a mapping by benchmark group and parameter, keeping only the
/// variants in `restrict_to` when given.
pub fn reshape(
    mapping: &CanonicalMapping,
    restrict_to: Option<&BTreeSet<String>>,
) -> GroupedSeries {
    let mut groups: BTreeMap<String, ParamSeries> = BTreeMap::new();
    for (full, value) in mapping.iter() {
        let parsed = name::decompose(full);
        if restrict_to.is_some_and(|allowed| !allowed.contains(parsed.variant())) {
            continue;
        }
        groups
            .entry(parsed.group().to_string())
            .or_default()
            .entry(ParamKey::from_segment(parsed.parameter()))
            .or_default()
            .insert(parsed.variant().to_string(), value);
    }
    GroupedSeries { groups }
}
