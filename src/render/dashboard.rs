//! Dashboard feeds: the github-action-benchmark list format and the
//! Bencher Metric Format object. Both carry tracked variants only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BenchTrackError, config::ReportConfig, mapping::CanonicalMapping, units::round_to};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardEntry {
    pub name: String,
    pub unit: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BmfMeasure {
    pub value: f64,
}

pub type BmfReport = BTreeMap<String, BTreeMap<String, BmfMeasure>>;

pub fn dashboard_entries(
    mapping: &CanonicalMapping,
    config: &ReportConfig,
) -> Vec<DashboardEntry> {
    let precision = config.profile.precision;
    mapping
        .filter_variants(|variant| config.is_tracked(variant))
        .map(|(name, value)| DashboardEntry {
            name: name.to_string(),
            unit: config.profile.dashboard_unit.clone(),
            value: round_to(value, precision),
        })
        .collect()
}

pub fn bmf_report(mapping: &CanonicalMapping, config: &ReportConfig) -> BmfReport {
    let precision = config.profile.precision;
    mapping
        .filter_variants(|variant| config.is_tracked(variant))
        .map(|(name, value)| {
            let measure = BmfMeasure {
                value: round_to(value, precision),
            };
            let measures = BTreeMap::from([(config.profile.bmf_key.clone(), measure)]);
            (name.to_string(), measures)
        })
        .collect()
}

pub fn to_dashboard_json(
    mapping: &CanonicalMapping,
    config: &ReportConfig,
) -> Result<String, BenchTrackError> {
    serde_json::to_string_pretty(&dashboard_entries(mapping, config))
        .map_err(|e| BenchTrackError::render(e.to_string()))
}

pub fn to_bmf_json(
    mapping: &CanonicalMapping,
    config: &ReportConfig,
) -> Result<String, BenchTrackError> {
    serde_json::to_string_pretty(&bmf_report(mapping, config))
        .map_err(|e| BenchTrackError::render(e.to_string()))
}
