//! Report configuration: which variants are tracked, how they are ordered,
//! colored and labelled, and how values are expressed.
//!
//! Two presets mirror the two supported sources. Either can be overridden
//! from a JSON file and then from command-line flags.
//!
//! ```rust
//! use benchtrack::config::ReportConfig;
//!
//! let mut cfg = ReportConfig::criterion();
//! assert!(cfg.is_tracked("rt_nightly"));
//! assert!(!cfg.is_tracked("system"));
//!
//! cfg.threshold = 0.10;
//! cfg.tracked_variants = None; // track everything
//! assert!(cfg.is_tracked("system"));
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BenchTrackError, compare::DEFAULT_THRESHOLD, units::MetricUnit};

pub const DEFAULT_BASE_SUFFIX: &str = "_base";
pub const FALLBACK_COLOR: &str = "#999999";

/// How values of one source are expressed in the outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricProfile {
    pub unit: MetricUnit,
    /// `unit` field of the dashboard feed.
    pub dashboard_unit: String,
    /// Measure key of the Bencher Metric Format feed.
    pub bmf_key: String,
    /// Decimal places kept in the dashboard and BMF feeds.
    pub precision: u32,
}

impl MetricProfile {
    pub fn nanoseconds() -> Self {
        Self {
            unit: MetricUnit::Nanoseconds,
            dashboard_unit: "ns".into(),
            bmf_key: "latency".into(),
            precision: 2,
        }
    }

    pub fn wall_seconds() -> Self {
        Self {
            unit: MetricUnit::Seconds,
            dashboard_unit: "seconds".into(),
            bmf_key: "elapsed".into(),
            precision: 4,
        }
    }
}

impl Default for MetricProfile {
    fn default() -> Self {
        Self::nanoseconds()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Relative change above which a benchmark is flagged.
    pub threshold: f64,
    /// Variants shown on dashboards and counted in the report summary.
    /// `None` tracks every variant.
    pub tracked_variants: Option<BTreeSet<String>>,
    /// Variants drawn on charts. `None` draws every variant.
    pub chart_variants: Option<BTreeSet<String>>,
    /// Display priority; unlisted variants follow in name order.
    pub display_order: Vec<String>,
    pub colors: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
    /// X-axis caption per group for parameterized charts.
    pub x_axis_labels: BTreeMap<String, String>,
    pub profile: MetricProfile,
    /// Variant suffix marking base runs inside a single log.
    pub base_suffix: String,
    pub report_title: String,
    /// Caption for the tracked-variant summary line.
    pub tracked_heading: String,
    pub charts_title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            tracked_variants: None,
            chart_variants: None,
            display_order: Vec::new(),
            colors: BTreeMap::new(),
            labels: BTreeMap::new(),
            x_axis_labels: BTreeMap::new(),
            profile: MetricProfile::default(),
            base_suffix: DEFAULT_BASE_SUFFIX.into(),
            report_title: "Benchmark Comparison".into(),
            tracked_heading: "tracked variants".into(),
            charts_title: "Benchmark Charts".into(),
        }
    }
}

const CRITERION_ALLOCATORS: &[(&str, &str, &str)] = &[
    ("system", "#888888", "system"),
    ("rt_nightly", "#2ca02c", "rt (nightly)"),
    ("rt_percpu", "#98df8a", "rt (percpu)"),
    ("rt_std", "#9467bd", "rt (std)"),
    ("rt_nostd", "#d62728", "rt (nostd)"),
    ("mimalloc", "#17becf", "mimalloc"),
    ("google_tc", "#ff7f0e", "tcmalloc"),
    ("jemalloc", "#1f77b4", "jemalloc"),
    ("snmalloc", "#e377c2", "snmalloc"),
    ("rpmalloc", "#bcbd22", "rpmalloc"),
];

const CRITERION_TRACKED: &[&str] = &["rt_nightly", "rt_std", "rt_nostd", "rt_percpu"];

const SIZE_GROUPS: &[&str] = &["single_alloc_dealloc", "batch_1000", "churn"];

const MIMALLOC_BENCH_COLORS: &[(&str, &str)] = &[
    ("rt_nightly", "#2ca02c"),
    ("rt_std", "#9467bd"),
    ("mimalloc", "#17becf"),
    ("system", "#888888"),
];

impl ReportConfig {
    /// Preset for Criterion micro-benchmarks of the allocator variants.
    pub fn criterion() -> Self {
        let mut x_axis_labels: BTreeMap<String, String> = SIZE_GROUPS
            .iter()
            .map(|g| (g.to_string(), "Allocation size (bytes)".to_string()))
            .collect();
        x_axis_labels.insert("thread_scalability".into(), "Threads".into());
        Self {
            tracked_variants: Some(CRITERION_TRACKED.iter().map(|s| s.to_string()).collect()),
            chart_variants: Some(
                CRITERION_ALLOCATORS
                    .iter()
                    .map(|(name, ..)| name.to_string())
                    .collect(),
            ),
            display_order: CRITERION_ALLOCATORS
                .iter()
                .map(|(name, ..)| name.to_string())
                .collect(),
            colors: CRITERION_ALLOCATORS
                .iter()
                .map(|(name, color, _)| (name.to_string(), color.to_string()))
                .collect(),
            labels: CRITERION_ALLOCATORS
                .iter()
                .map(|(name, _, label)| (name.to_string(), label.to_string()))
                .collect(),
            x_axis_labels,
            profile: MetricProfile::nanoseconds(),
            tracked_heading: "rtmalloc variants".into(),
            charts_title: "rtmalloc Benchmark Charts".into(),
            ..Self::default()
        }
    }

    /// Preset for whole-program runs parsed from a mimalloc-bench log.
    pub fn mimalloc_bench() -> Self {
        Self {
            colors: MIMALLOC_BENCH_COLORS
                .iter()
                .map(|(name, color)| (name.to_string(), color.to_string()))
                .collect(),
            profile: MetricProfile::wall_seconds(),
            report_title: "mimalloc-bench Results".into(),
            tracked_heading: "allocators".into(),
            charts_title: "mimalloc-bench Charts".into(),
            ..Self::default()
        }
    }

    /// Overlays the fields present in a JSON file onto `self`. Nested
    /// objects merge key by key; arrays and scalars replace.
    pub fn with_overrides_from(self, path: &Path) -> Result<Self, BenchTrackError> {
        let overrides = read_json(path)?;
        let Value::Object(fields) = overrides else {
            return Err(BenchTrackError::invalid_input(format!(
                "config {} must contain a JSON object",
                path.display()
            )));
        };
        let mut merged = serde_json::to_value(&self)
            .map_err(|e| BenchTrackError::invalid_input(e.to_string()))?;
        overlay(&mut merged, Value::Object(fields));
        let config: Self = serde_json::from_value(merged)
            .map_err(|e| BenchTrackError::parse(format!("config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BenchTrackError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(BenchTrackError::invalid_input(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn is_tracked(&self, variant: &str) -> bool {
        self.tracked_variants
            .as_ref()
            .is_none_or(|set| set.contains(variant))
    }

    pub fn is_charted(&self, variant: &str) -> bool {
        self.chart_variants
            .as_ref()
            .is_none_or(|set| set.contains(variant))
    }

    pub fn color_for(&self, variant: &str) -> &str {
        self.colors
            .get(variant)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    pub fn label_for<'a>(&'a self, variant: &'a str) -> &'a str {
        self.labels
            .get(variant)
            .map(String::as_str)
            .unwrap_or(variant)
    }

    pub fn x_axis_label(&self, group: &str) -> &str {
        self.x_axis_labels
            .get(group)
            .map(String::as_str)
            .unwrap_or("Parameter")
    }

    /// Threshold as a whole percent, for captions.
    pub fn threshold_percent(&self) -> u32 {
        (self.threshold * 100.0).round() as u32
    }
}

fn overlay(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

fn read_json(path: &Path) -> Result<Value, BenchTrackError> {
    let data = fs::read(path)
        .map_err(|e| BenchTrackError::io(format!("config {}: {e}", path.display())))?;
    serde_json::from_slice(&data)
        .map_err(|e| BenchTrackError::parse(format!("config {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_profile() {
        assert_eq!(ReportConfig::criterion().profile.unit, MetricUnit::Nanoseconds);
        assert_eq!(ReportConfig::mimalloc_bench().profile.unit, MetricUnit::Seconds);
        assert!(ReportConfig::mimalloc_bench().tracked_variants.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: ReportConfig = serde_json::from_str(r#"{"threshold": 0.1}"#).unwrap();
        assert_eq!(cfg.threshold, 0.1);
        assert_eq!(cfg.base_suffix, DEFAULT_BASE_SUFFIX);
    }

    #[test]
    fn test_overlay_merges_nested_objects() {
        let mut target = serde_json::json!({"profile": {"unit": "seconds", "precision": 4}});
        overlay(&mut target, serde_json::json!({"profile": {"precision": 3}}));
        assert_eq!(target["profile"]["unit"], "seconds");
        assert_eq!(target["profile"]["precision"], 3);
    }

    #[test]
    fn test_x_axis_label_falls_back() {
        let cfg = ReportConfig::criterion();
        assert_eq!(cfg.x_axis_label("thread_scalability"), "Threads");
        assert_eq!(cfg.x_axis_label("churn"), "Allocation size (bytes)");
        assert_eq!(cfg.x_axis_label("other"), "Parameter");
    }
}
