//! Adapters that turn on-disk benchmark evidence into a [`CanonicalMapping`].
//!
//! Collectors never fail: unreadable records are skipped and counted, and a
//! missing or empty source yields an empty mapping with a warning attached.

pub mod criterion;
pub mod mimalloc_log;

use std::path::Path;

use tracing::warn;

use crate::mapping::CanonicalMapping;

pub use criterion::CriterionCollector;
pub use mimalloc_log::{LogRecord, MimallocLogCollector};

/// Result of one collection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    pub mapping: CanonicalMapping,
    /// Records that were present but could not be used.
    pub skipped: usize,
    /// Non-fatal diagnostic for the caller, set when nothing was collected.
    pub warning: Option<String>,
}

impl Collection {
    pub(crate) fn finish(mapping: CanonicalMapping, skipped: usize, source: &Path) -> Self {
        let warning = if mapping.is_empty() {
            let message = format!("no benchmark results found in {}", source.display());
            warn!(source = %source.display(), skipped, "{message}");
            Some(message)
        } else {
            None
        };
        Self {
            mapping,
            skipped,
            warning,
        }
    }
}

/// The supported raw formats.
#[derive(Clone, Debug)]
pub enum Collector {
    /// Criterion's `target/criterion` directory tree.
    Criterion(CriterionCollector),
    /// A mimalloc-bench `benchres.csv` style whitespace log.
    MimallocLog(MimallocLogCollector),
}

impl Collector {
    pub fn collect(&self) -> Collection {
        match self {
            Collector::Criterion(c) => c.collect(),
            Collector::MimallocLog(c) => c.collect(),
        }
    }
}
