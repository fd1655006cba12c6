use std::{cell::RefCell, fs};

use benchtrack::{
    BenchTrackError, CanonicalMapping, ReportConfig,
    compare::compare,
    mapping::{load_snapshot, write_snapshot},
    render::{
        ChartBackend, ChartLayout, ChartSpec, build_chart_specs, generate_charts,
        render_comparison, to_bmf_json, to_dashboard_json,
    },
    reshape::reshape,
};
use serde_json::Value;
use tempfile::TempDir;

fn mapping(pairs: &[(&str, f64)]) -> CanonicalMapping {
    pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
}

#[derive(Default)]
struct RecordingBackend {
    seen: RefCell<Vec<String>>,
}

impl ChartBackend for RecordingBackend {
    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, BenchTrackError> {
        self.seen.borrow_mut().push(spec.group.clone());
        Ok(spec.title.clone().into_bytes())
    }
}

#[test]
fn test_dashboard_json_single_estimate() {
    let head = mapping(&[("single_alloc_dealloc/rt_nightly/8", 1500.0)]);
    let json = to_dashboard_json(&head, &ReportConfig::criterion()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "single_alloc_dealloc/rt_nightly/8");
    assert_eq!(entries[0]["unit"], "ns");
    assert_eq!(entries[0]["value"].as_f64(), Some(1500.0));
}

#[test]
fn test_bmf_uses_profile_key() {
    let head = mapping(&[("cfrac/mi", 0.123456), ("cfrac/sys", 0.2)]);
    let json = to_bmf_json(&head, &ReportConfig::mimalloc_bench()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cfrac/mi"]["elapsed"]["value"].as_f64(), Some(0.1235));
    assert_eq!(value.as_object().unwrap().len(), 2);
}

#[test]
fn test_markdown_is_deterministic() {
    let base = mapping(&[("a/rt_std/8", 100.0), ("a/system/8", 80.0), ("b/rt_std", 5.0)]);
    let head = mapping(&[("a/rt_std/8", 106.0), ("a/system/8", 70.0), ("c/rt_std", 1.0)]);
    let entries = compare(&base, &head, 0.05);
    let config = ReportConfig::criterion();
    let first = render_comparison(&entries, &config);
    let second = render_comparison(&entries, &config);
    assert_eq!(first, second);
    assert!(first.contains("1 regressed"));
    assert!(first.contains("| rt_std | 8 | 100.0 ns | 106.0 ns | +6.0%"));
    assert!(first.contains("### New benchmarks"));
    assert!(first.contains("- ~~b/rt_std~~"));
}

#[test]
fn test_markdown_seconds_formatting() {
    let base = mapping(&[("cfrac/mi", 1.0)]);
    let head = mapping(&[("cfrac/mi", 1.5)]);
    let entries = compare(&base, &head, 0.05);
    let report = render_comparison(&entries, &ReportConfig::mimalloc_bench());
    assert!(report.contains("| mi | - | 1.00s | 1.50s | +50.0%"));
}

#[test]
fn test_snapshot_round_trip_is_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseline.json");
    let original = mapping(&[("a/x/1", 1234.567_890_123), ("b/y", 0.1 + 0.2)]);
    write_snapshot(&original, &path).unwrap();
    let loaded = load_snapshot(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn test_missing_snapshot_is_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = load_snapshot(&dir.path().join("none.json")).unwrap_err();
    assert!(matches!(err, BenchTrackError::MissingInput(_)));
}

#[test]
fn test_chart_layout_per_group() {
    let head = mapping(&[
        ("churn/rt_std/8", 10.0),
        ("churn/rt_std/64", 2000.0),
        ("startup/system", 1_500_000.0),
    ]);
    let mut config = ReportConfig::criterion();
    config.chart_variants = None;
    let specs = build_chart_specs(&reshape(&head, None), &config);
    assert_eq!(specs.len(), 2);

    assert_eq!(specs[0].group, "churn");
    assert_eq!(specs[0].y_label, "Time (\u{00b5}s)");
    match &specs[0].layout {
        ChartLayout::Clustered {
            categories,
            log_scale,
            x_label,
            ..
        } => {
            assert_eq!(categories, &vec!["8".to_string(), "64".to_string()]);
            assert!(*log_scale);
            assert_eq!(x_label, "Allocation size (bytes)");
        }
        other => panic!("expected clustered layout, got {other:?}"),
    }

    assert_eq!(specs[1].y_label, "Time (ms)");
    assert!(matches!(specs[1].layout, ChartLayout::Single { .. }));
}

#[test]
fn test_generate_charts_writes_index_last() {
    let dir = TempDir::new().unwrap();
    let head = mapping(&[("churn/rt_std/8", 10.0), ("startup/rt_std", 5.0)]);
    let backend = RecordingBackend::default();
    let files = generate_charts(
        &reshape(&head, None),
        &ReportConfig::criterion(),
        Some(&backend as &dyn ChartBackend),
        dir.path(),
    )
    .unwrap();
    assert_eq!(files, vec!["churn.txt", "startup.txt", "index.html"]);
    assert_eq!(backend.seen.borrow().len(), 2);
    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains("churn.txt"));
    assert!(index.contains("startup.txt"));
}

#[test]
fn test_generate_charts_without_backend() {
    let dir = TempDir::new().unwrap();
    let head = mapping(&[("startup/rt_std", 5.0)]);
    let err = generate_charts(
        &reshape(&head, None),
        &ReportConfig::criterion(),
        None,
        dir.path(),
    )
    .unwrap_err();
    assert!(matches!(err, BenchTrackError::BackendUnavailable(_)));
    assert!(!dir.path().join("index.html").exists());
}

struct FailingBackend {
    failing_group: &'static str,
}

impl ChartBackend for FailingBackend {
    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, BenchTrackError> {
        if spec.group == self.failing_group {
            return Err(BenchTrackError::render("backend refused group"));
        }
        Ok(spec.title.clone().into_bytes())
    }
}

#[test]
fn test_one_failing_chart_keeps_the_rest() {
    let dir = TempDir::new().unwrap();
    let head = mapping(&[("a/rt_std", 1.0), ("b/rt_std", 2.0), ("c/rt_std", 3.0)]);
    let backend = FailingBackend { failing_group: "a" };
    let err = generate_charts(
        &reshape(&head, None),
        &ReportConfig::criterion(),
        Some(&backend as &dyn ChartBackend),
        dir.path(),
    )
    .unwrap_err();
    assert!(matches!(err, BenchTrackError::Render(_)));
    assert!(err.to_string().contains("1 of 3 charts failed"));
    assert!(!dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
    assert!(dir.path().join("c.txt").exists());
    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains("b.txt"));
    assert!(!index.contains("a.txt"));
}

#[test]
fn test_mimalloc_verdict_reads_as_a_sentence() {
    let base = mapping(&[("cfrac/mi", 1.0)]);
    let head = mapping(&[("cfrac/mi", 1.01)]);
    let entries = compare(&base, &head, 0.05);
    let report = render_comparison(&entries, &ReportConfig::mimalloc_bench());
    assert!(report.contains("> No significant changes in allocators.\n"));
}
