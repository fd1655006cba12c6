use benchtrack::{
    CanonicalMapping, Classification, ComparisonEntry, ComparisonSummary,
    compare::{DEFAULT_THRESHOLD, classify, compare},
};
use proptest::prelude::*;

fn mapping(pairs: &[(&str, f64)]) -> CanonicalMapping {
    pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
}

#[test]
fn test_six_percent_slowdown_regresses() {
    let base = mapping(&[("a/x", 100.0)]);
    let head = mapping(&[("a/x", 106.0)]);
    let entries = compare(&base, &head, 0.05);
    assert_eq!(
        entries,
        vec![ComparisonEntry::Regressed {
            name: "a/x".into(),
            base: 100.0,
            head: 106.0,
            change: 0.06,
        }]
    );
}

#[test]
fn test_threshold_is_exclusive() {
    assert_eq!(classify(100.0, 105.0, 0.05).0, Classification::Unchanged);
    assert_eq!(classify(100.0, 95.0, 0.05).0, Classification::Unchanged);
    assert_eq!(classify(100.0, 105.1, 0.05).0, Classification::Regressed);
    assert_eq!(classify(100.0, 94.9, 0.05).0, Classification::Improved);
}

#[test]
fn test_zero_base_is_unchanged() {
    let (class, change) = classify(0.0, 42.0, DEFAULT_THRESHOLD);
    assert_eq!(class, Classification::Unchanged);
    assert_eq!(change, 0.0);
}

#[test]
fn test_new_and_removed_entries() {
    let base = mapping(&[("a/x", 1.0), ("b/x", 2.0)]);
    let head = mapping(&[("b/x", 2.0), ("c/x", 3.0)]);
    let entries = compare(&base, &head, DEFAULT_THRESHOLD);
    let classes: Vec<Classification> = entries.iter().map(|e| e.classification()).collect();
    assert_eq!(
        classes,
        vec![
            Classification::Removed,
            Classification::Unchanged,
            Classification::New
        ]
    );
    assert_eq!(entries[0].change(), None);
}

#[test]
fn test_summary_counts_only_selected_variants() {
    let base = mapping(&[("a/rt_std", 100.0), ("a/system", 100.0)]);
    let head = mapping(&[("a/rt_std", 120.0), ("a/system", 50.0)]);
    let entries = compare(&base, &head, DEFAULT_THRESHOLD);
    let summary = ComparisonSummary::from_entries(&entries, |v| v == "rt_std");
    assert_eq!(summary.regressed, 1);
    assert_eq!(summary.improved, 0);
    assert!(summary.has_regressions());
}

proptest! {
    #[test]
    fn prop_every_name_lands_in_exactly_one_class(
        base in prop::collection::btree_map("[a-d]/[xy]", 1.0f64..1000.0, 0..8),
        head in prop::collection::btree_map("[a-d]/[xy]", 1.0f64..1000.0, 0..8),
    ) {
        let base: CanonicalMapping = base.into_iter().collect();
        let head: CanonicalMapping = head.into_iter().collect();
        let entries = compare(&base, &head, DEFAULT_THRESHOLD);

        let mut union: Vec<&str> = base.names().chain(head.names()).collect();
        union.sort();
        union.dedup();
        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        prop_assert_eq!(names, union);

        for entry in &entries {
            let in_base = base.contains(entry.name());
            let in_head = head.contains(entry.name());
            match entry.classification() {
                Classification::New => prop_assert!(!in_base && in_head),
                Classification::Removed => prop_assert!(in_base && !in_head),
                _ => prop_assert!(in_base && in_head),
            }
        }
    }
}
