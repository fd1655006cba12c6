use std::fs;

use benchtrack::{BenchTrackError, MetricUnit, ReportConfig};
use tempfile::TempDir;

fn overrides(json: &str) -> Result<ReportConfig, BenchTrackError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, json).unwrap();
    ReportConfig::mimalloc_bench().with_overrides_from(&path)
}

#[test]
fn test_nested_profile_override_keeps_preset_fields() {
    let config = overrides(r#"{"profile": {"precision": 3}}"#).unwrap();
    assert_eq!(config.profile.precision, 3);
    assert_eq!(config.profile.unit, MetricUnit::Seconds);
    assert_eq!(config.profile.dashboard_unit, "seconds");
    assert_eq!(config.profile.bmf_key, "elapsed");
}

#[test]
fn test_color_override_extends_preset_table() {
    let config = overrides(r##"{"colors": {"jemalloc": "#1f77b4"}}"##).unwrap();
    assert_eq!(config.color_for("jemalloc"), "#1f77b4");
    assert_eq!(config.color_for("mimalloc"), "#17becf");
}

#[test]
fn test_top_level_override_and_validation() {
    let config = overrides(r#"{"threshold": 0.1, "report_title": "Nightly"}"#).unwrap();
    assert_eq!(config.threshold, 0.1);
    assert_eq!(config.report_title, "Nightly");
    assert_eq!(config.base_suffix, "_base");

    let err = overrides(r#"{"threshold": -1.0}"#).unwrap_err();
    assert!(matches!(err, BenchTrackError::InvalidInput(_)));
    let err = overrides("[1, 2]").unwrap_err();
    assert!(matches!(err, BenchTrackError::InvalidInput(_)));
}
