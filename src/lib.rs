//! Benchmark result tracking for allocator suites.
//!
//! Collects Criterion output trees and mimalloc-bench logs into one flat
//! `group/variant[/parameter]` mapping, compares a base run against a head
//! run, and renders dashboard feeds, a Markdown report and charts.

pub mod bench_utils;
pub mod cli;
pub mod collector;
pub mod compare;
pub mod config;
pub mod errors;
pub mod logging;
pub mod mapping;
pub mod name;
pub mod pipeline;
pub mod render;
pub mod reshape;
pub mod units;

pub use crate::collector::{Collection, Collector, CriterionCollector, MimallocLogCollector};
pub use crate::compare::{Classification, ComparisonEntry, ComparisonSummary, compare};
pub use crate::config::{MetricProfile, ReportConfig};
pub use crate::errors::BenchTrackError;
pub use crate::mapping::CanonicalMapping;
pub use crate::name::BenchmarkName;
pub use crate::pipeline::{ReportOutcome, ReportRequest, run_report};
pub use crate::units::MetricUnit;
