//! One batch pass: collect, optionally compare, then run every requested
//! renderer. A renderer's failure is recorded and never stops its siblings.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::{error, info, warn};

use crate::{
    BenchTrackError,
    collector::{Collection, Collector, CriterionCollector, MimallocLogCollector},
    compare,
    config::ReportConfig,
    mapping::{self, CanonicalMapping},
    render::{self, ChartBackend},
    reshape,
};

/// Where the base run of a Criterion comparison comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BaseInput {
    Absent,
    /// A second Criterion directory tree.
    Directory(PathBuf),
    /// A snapshot written by an earlier `--output-baseline`.
    Snapshot(PathBuf),
}

#[derive(Clone, Debug)]
pub enum Source {
    Criterion {
        collector: CriterionCollector,
        base: BaseInput,
    },
    /// Base runs live in the same log under suffixed variant names.
    MimallocLog { collector: MimallocLogCollector },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputPaths {
    pub dashboard_json: Option<PathBuf>,
    pub bmf_json: Option<PathBuf>,
    pub baseline: Option<PathBuf>,
    pub comment: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub source: Source,
    pub outputs: OutputPaths,
    pub config: ReportConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    DashboardJson,
    BmfJson,
    Baseline,
    Charts,
    Comment,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputKind::DashboardJson => "dashboard json",
            OutputKind::BmfJson => "bmf json",
            OutputKind::Baseline => "baseline snapshot",
            OutputKind::Charts => "charts",
            OutputKind::Comment => "comparison comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct OutputStatus {
    pub kind: OutputKind,
    /// Entries, files or comparison rows written.
    pub result: Result<usize, BenchTrackError>,
}

#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub head_entries: usize,
    pub warnings: Vec<String>,
    pub outputs: Vec<OutputStatus>,
}

impl ReportOutcome {
    pub fn status(&self, kind: OutputKind) -> Option<&OutputStatus> {
        self.outputs.iter().find(|s| s.kind == kind)
    }

    /// Failures other than a missing image backend, which only degrades.
    pub fn failures(&self) -> impl Iterator<Item = &OutputStatus> {
        self.outputs.iter().filter(|s| {
            matches!(&s.result, Err(err) if !matches!(err, BenchTrackError::BackendUnavailable(_)))
        })
    }

    pub fn exit_code(&self) -> i32 {
        if self.failures().next().is_some() { 1 } else { 0 }
    }
}

struct Prepared {
    /// Everything collected, unfiltered and unsplit.
    collected: CanonicalMapping,
    head: CanonicalMapping,
    /// Base carried by the source itself (suffix-split logs).
    inline_base: Option<CanonicalMapping>,
}

fn prepare(request: &ReportRequest, outcome: &mut ReportOutcome) -> Prepared {
    match &request.source {
        Source::Criterion { collector, .. } => {
            let collection = collector.collect();
            note_warning(&collection, outcome);
            Prepared {
                head: collection.mapping.clone(),
                collected: collection.mapping,
                inline_base: None,
            }
        }
        Source::MimallocLog { collector } => {
            let collection = collector.collect();
            note_warning(&collection, outcome);
            let (base, head) =
                mapping::split_base_suffix(&collection.mapping, &request.config.base_suffix);
            Prepared {
                collected: collection.mapping,
                head,
                inline_base: Some(base),
            }
        }
    }
}

fn note_warning(collection: &Collection, outcome: &mut ReportOutcome) {
    if let Some(warning) = &collection.warning {
        outcome.warnings.push(warning.clone());
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), BenchTrackError> {
    fs::write(path, contents)
        .map_err(|e| BenchTrackError::io(format!("{}: {e}", path.display())))
}

fn resolve_base(
    request: &ReportRequest,
    prepared: &Prepared,
    outcome: &mut ReportOutcome,
) -> Result<CanonicalMapping, BenchTrackError> {
    if let Some(base) = &prepared.inline_base {
        if base.is_empty() && !prepared.head.is_empty() {
            return Err(BenchTrackError::missing_input(format!(
                "no base runs with suffix {:?} found",
                request.config.base_suffix
            )));
        }
        return Ok(base.clone());
    }
    let Source::Criterion { collector, base } = &request.source else {
        return Ok(CanonicalMapping::new());
    };
    match base {
        BaseInput::Directory(dir) => {
            let base_run = Collector::Criterion(
                CriterionCollector::new(dir).with_statistic(collector.statistic()),
            );
            let collection = base_run.collect();
            note_warning(&collection, outcome);
            Ok(collection.mapping)
        }
        BaseInput::Snapshot(path) => {
            let base = mapping::load_snapshot(path)?;
            info!(entries = base.len(), path = %path.display(), "loaded baseline entries");
            Ok(base)
        }
        BaseInput::Absent => Err(BenchTrackError::missing_input(
            "a base directory or baseline snapshot is required for a comparison comment",
        )),
    }
}

fn render_comment(
    request: &ReportRequest,
    prepared: &Prepared,
    base: Result<CanonicalMapping, BenchTrackError>,
    path: &Path,
) -> Result<usize, BenchTrackError> {
    let base = base?;
    let entries = compare::compare(&base, &prepared.head, request.config.threshold);
    let comment = render::render_comparison(&entries, &request.config);
    write_output(path, &comment)?;
    info!(path = %path.display(), "wrote comparison comment");
    Ok(entries.len())
}

/// Runs the whole request with the given image backend.
pub fn run_report(request: &ReportRequest, backend: Option<&dyn ChartBackend>) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();
    let prepared = prepare(request, &mut outcome);
    outcome.head_entries = prepared.head.len();
    let config = &request.config;
    let outputs = &request.outputs;
    // Read before any output is written; the snapshot may share a path
    // with the new baseline.
    let base = outputs
        .comment
        .as_ref()
        .map(|_| resolve_base(request, &prepared, &mut outcome));

    if let Some(path) = &outputs.dashboard_json {
        let count = render::dashboard::dashboard_entries(&prepared.head, config).len();
        let written = render::to_dashboard_json(&prepared.head, config)
            .and_then(|json| write_output(path, &json))
            .map(|_| count);
        if written.is_ok() {
            info!(count, path = %path.display(), "wrote dashboard entries");
        }
        record(&mut outcome, OutputKind::DashboardJson, written);
    }

    if let Some(path) = &outputs.bmf_json {
        let count = render::dashboard::bmf_report(&prepared.head, config).len();
        let written = render::to_bmf_json(&prepared.head, config)
            .and_then(|json| write_output(path, &json))
            .map(|_| count);
        if written.is_ok() {
            info!(count, path = %path.display(), "wrote BMF entries");
        }
        record(&mut outcome, OutputKind::BmfJson, written);
    }

    if let Some(path) = &outputs.baseline {
        let written = mapping::write_snapshot(&prepared.collected, path)
            .map(|_| prepared.collected.len());
        if let Ok(count) = written {
            info!(count, path = %path.display(), "wrote baseline entries");
        }
        record(&mut outcome, OutputKind::Baseline, written);
    }

    if let Some(dir) = &outputs.charts_dir {
        let grouped = reshape::reshape(&prepared.head, config.chart_variants.as_ref());
        let written =
            render::generate_charts(&grouped, config, backend, dir).map(|files| files.len());
        record(&mut outcome, OutputKind::Charts, written);
    }

    if let (Some(path), Some(base)) = (&outputs.comment, base) {
        let written = render_comment(request, &prepared, base, path);
        record(&mut outcome, OutputKind::Comment, written);
    }

    outcome
}

fn record(outcome: &mut ReportOutcome, kind: OutputKind, result: Result<usize, BenchTrackError>) {
    match &result {
        Err(err @ BenchTrackError::BackendUnavailable(_)) => {
            warn!(output = %kind, "{err}");
            outcome.warnings.push(err.to_string());
        }
        Err(err) => error!(output = %kind, "{err}"),
        Ok(_) => {}
    }
    outcome.outputs.push(OutputStatus { kind, result });
}
