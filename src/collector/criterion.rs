use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use super::Collection;
use crate::mapping::CanonicalMapping;

/// Directory Criterion writes the current run into. The sibling `base`
/// directory holds the previous run and is never read.
pub const CURRENT_RUN_DIR: &str = "new";
pub const ESTIMATES_FILE: &str = "estimates.json";
pub const DEFAULT_STATISTIC: &str = "median";

/// Scans a Criterion output tree for point estimates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriterionCollector {
    root: PathBuf,
    statistic: String,
}

impl CriterionCollector {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            statistic: DEFAULT_STATISTIC.to_string(),
        }
    }

    /// Reads `<statistic>.point_estimate` instead of the median.
    pub fn with_statistic(mut self, statistic: impl Into<String>) -> Self {
        self.statistic = statistic.into();
        self
    }

    pub fn statistic(&self) -> &str {
        &self.statistic
    }

    pub fn collect(&self) -> Collection {
        let mut mapping = CanonicalMapping::new();
        let mut skipped = 0usize;
        if !self.root.is_dir() {
            return Collection::finish(mapping, skipped, &self.root);
        }
        for entry in WalkDir::new(&self.root).into_iter().filter_map(Result::ok) {
            if !is_current_estimate(entry.path()) {
                continue;
            }
            let Some(name) = benchmark_name(&self.root, entry.path()) else {
                skipped += 1;
                continue;
            };
            match read_point_estimate(entry.path(), &self.statistic) {
                Some(value) => {
                    mapping.insert(name, value);
                }
                None => {
                    debug!(path = %entry.path().display(), "skipping unreadable estimate");
                    skipped += 1;
                }
            }
        }
        Collection::finish(mapping, skipped, &self.root)
    }
}

fn is_current_estimate(path: &Path) -> bool {
    path.file_name().is_some_and(|f| f == ESTIMATES_FILE)
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|d| d == CURRENT_RUN_DIR)
}

/// `root/group/variant/param/new/estimates.json` -> `group/variant/param`.
fn benchmark_name(root: &Path, estimate: &Path) -> Option<String> {
    let run_dir = estimate.parent()?;
    let bench_dir = run_dir.parent()?;
    let relative = bench_dir.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

fn read_point_estimate(path: &Path, statistic: &str) -> Option<f64> {
    let data = fs::read(path).ok()?;
    let value: Value = serde_json::from_slice(&data).ok()?;
    value.get(statistic)?.get("point_estimate")?.as_f64()
}
