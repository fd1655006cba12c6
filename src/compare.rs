//! Classification of a head run against a base run.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{mapping::CanonicalMapping, name};

pub const DEFAULT_THRESHOLD: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Improved,
    Regressed,
    Unchanged,
    New,
    Removed,
}

/// One benchmark's fate between base and head.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonEntry {
    Improved {
        name: String,
        base: f64,
        head: f64,
        change: f64,
    },
    Regressed {
        name: String,
        base: f64,
        head: f64,
        change: f64,
    },
    Unchanged {
        name: String,
        base: f64,
        head: f64,
        change: f64,
    },
    New {
        name: String,
        head: f64,
    },
    Removed {
        name: String,
        base: f64,
    },
}

impl ComparisonEntry {
    pub fn name(&self) -> &str {
        match self {
            ComparisonEntry::Improved { name, .. }
            | ComparisonEntry::Regressed { name, .. }
            | ComparisonEntry::Unchanged { name, .. }
            | ComparisonEntry::New { name, .. }
            | ComparisonEntry::Removed { name, .. } => name,
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            ComparisonEntry::Improved { .. } => Classification::Improved,
            ComparisonEntry::Regressed { .. } => Classification::Regressed,
            ComparisonEntry::Unchanged { .. } => Classification::Unchanged,
            ComparisonEntry::New { .. } => Classification::New,
            ComparisonEntry::Removed { .. } => Classification::Removed,
        }
    }

    /// `(base, head, change)` for entries present in both runs.
    pub fn paired(&self) -> Option<(f64, f64, f64)> {
        match *self {
            ComparisonEntry::Improved {
                base, head, change, ..
            }
            | ComparisonEntry::Regressed {
                base, head, change, ..
            }
            | ComparisonEntry::Unchanged {
                base, head, change, ..
            } => Some((base, head, change)),
            ComparisonEntry::New { .. } | ComparisonEntry::Removed { .. } => None,
        }
    }

    pub fn change(&self) -> Option<f64> {
        self.paired().map(|(_, _, change)| change)
    }
}

/// Relative change `(head - base) / base`, or `0.0` for a zero base.
pub fn relative_change(base: f64, head: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (head - base) / base
    }
}

/// Classifies a pair present in both runs. The threshold itself is
/// `Unchanged`; only strictly larger moves count.
pub fn classify(base: f64, head: f64, threshold: f64) -> (Classification, f64) {
    let change = relative_change(base, head);
    let class = if base == 0.0 {
        Classification::Unchanged
    } else if change < -threshold {
        Classification::Improved
    } else if change > threshold {
        Classification::Regressed
    } else {
        Classification::Unchanged
    };
    (class, change)
}

/// Compares every name in either mapping, in lexicographic order.
pub fn compare(
    base: &CanonicalMapping,
    head: &CanonicalMapping,
    threshold: f64,
) -> Vec<ComparisonEntry> {
    let names: BTreeSet<&str> = base.names().chain(head.names()).collect();
    names
        .into_iter()
        .filter_map(|name| {
            let entry = match (base.get(name), head.get(name)) {
                (Some(b), Some(h)) => {
                    let (class, change) = classify(b, h, threshold);
                    paired_entry(class, name.to_string(), b, h, change)
                }
                (None, Some(h)) => ComparisonEntry::New {
                    name: name.to_string(),
                    head: h,
                },
                (Some(b), None) => ComparisonEntry::Removed {
                    name: name.to_string(),
                    base: b,
                },
                (None, None) => return None,
            };
            Some(entry)
        })
        .collect()
}

fn paired_entry(
    class: Classification,
    name: String,
    base: f64,
    head: f64,
    change: f64,
) -> ComparisonEntry {
    match class {
        Classification::Improved => ComparisonEntry::Improved {
            name,
            base,
            head,
            change,
        },
        Classification::Regressed => ComparisonEntry::Regressed {
            name,
            base,
            head,
            change,
        },
        _ => ComparisonEntry::Unchanged {
            name,
            base,
            head,
            change,
        },
    }
}

/// Per-class counts over the entries whose variant passes a filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub improved: usize,
    pub regressed: usize,
    pub unchanged: usize,
    pub new: usize,
    pub removed: usize,
}

impl ComparisonSummary {
    pub fn from_entries<F>(entries: &[ComparisonEntry], mut include_variant: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let mut summary = Self::default();
        for entry in entries {
            if !include_variant(name::decompose(entry.name()).variant()) {
                continue;
            }
            match entry.classification() {
                Classification::Improved => summary.improved += 1,
                Classification::Regressed => summary.regressed += 1,
                Classification::Unchanged => summary.unchanged += 1,
                Classification::New => summary.new += 1,
                Classification::Removed => summary.removed += 1,
            }
        }
        summary
    }

    pub fn has_regressions(&self) -> bool {
        self.regressed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary_is_unchanged() {
        assert_eq!(classify(100.0, 105.0, 0.05).0, Classification::Unchanged);
        assert_eq!(classify(100.0, 95.0, 0.05).0, Classification::Unchanged);
        assert_eq!(classify(100.0, 106.0, 0.05).0, Classification::Regressed);
        assert_eq!(classify(100.0, 94.0, 0.05).0, Classification::Improved);
    }

    #[test]
    fn test_zero_base_is_unchanged() {
        assert_eq!(classify(0.0, 50.0, 0.05), (Classification::Unchanged, 0.0));
    }
}
