//! Command-line surface of the `benchtrack` binary.

use std::{collections::BTreeSet, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    BenchTrackError,
    collector::{CriterionCollector, MimallocLogCollector, criterion::DEFAULT_STATISTIC},
    config::ReportConfig,
    logging::Verbosity,
    pipeline::{BaseInput, OutputPaths, ReportRequest, Source},
};

#[derive(Debug, Parser)]
#[command(
    name = "benchtrack",
    version,
    about = "Turn allocator benchmark output into dashboard feeds, PR comments and charts"
)]
pub struct CommandLineConfig {
    #[command(subcommand)]
    pub source: SourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum SourceCommand {
    /// Read a Criterion output directory (e.g. target/criterion).
    Criterion(CriterionArgs),
    /// Read a mimalloc-bench results log (benchres.csv).
    Mimalloc(MimallocArgs),
}

#[derive(Debug, Args)]
pub struct CriterionArgs {
    /// Criterion directory of the current run.
    #[arg(long)]
    pub head: PathBuf,

    /// Criterion directory of the base run.
    #[arg(long, conflicts_with = "base_json")]
    pub base: Option<PathBuf>,

    /// Baseline snapshot written by an earlier --output-baseline.
    #[arg(long)]
    pub base_json: Option<PathBuf>,

    /// Estimate to read from each estimates.json.
    #[arg(long, default_value = DEFAULT_STATISTIC)]
    pub statistic: String,

    #[command(flatten)]
    pub shared: SharedArgs,
}

#[derive(Debug, Args)]
pub struct MimallocArgs {
    /// Path to the results log.
    #[arg(long, visible_alias = "csv")]
    pub log: PathBuf,

    /// Allocator-name suffix that marks base runs.
    #[arg(long)]
    pub base_suffix: Option<String>,

    #[command(flatten)]
    pub shared: SharedArgs,
}

#[derive(Debug, Default, Args)]
pub struct SharedArgs {
    /// Dashboard JSON (github-action-benchmark format).
    #[arg(long)]
    pub output_json: Option<PathBuf>,

    /// Bencher Metric Format JSON.
    #[arg(long)]
    pub output_bmf: Option<PathBuf>,

    /// Full, unfiltered snapshot for use as a future base.
    #[arg(long)]
    pub output_baseline: Option<PathBuf>,

    /// Markdown comparison report.
    #[arg(long)]
    pub output_comment: Option<PathBuf>,

    /// Directory for chart images and their index page.
    #[arg(long)]
    pub output_charts: Option<PathBuf>,

    /// Relative change that counts as a regression or improvement.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// JSON file overriding the preset configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated variants to track on dashboards.
    #[arg(long, value_delimiter = ',', conflicts_with = "track_all")]
    pub track: Option<Vec<String>>,

    /// Track every variant.
    #[arg(long)]
    pub track_all: bool,

    /// Comma-separated variants to draw on charts.
    #[arg(long, value_delimiter = ',')]
    pub chart_variants: Option<Vec<String>>,

    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

impl SharedArgs {
    fn outputs(&self) -> OutputPaths {
        OutputPaths {
            dashboard_json: self.output_json.clone(),
            bmf_json: self.output_bmf.clone(),
            baseline: self.output_baseline.clone(),
            comment: self.output_comment.clone(),
            charts_dir: self.output_charts.clone(),
        }
    }

    /// Preset, then config file, then flags.
    fn resolve_config(&self, preset: ReportConfig) -> Result<ReportConfig, BenchTrackError> {
        let mut config = match &self.config {
            Some(path) => preset.with_overrides_from(path)?,
            None => preset,
        };
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if self.track_all {
            config.tracked_variants = None;
        } else if let Some(track) = &self.track {
            config.tracked_variants = Some(to_set(track));
        }
        if let Some(variants) = &self.chart_variants {
            config.chart_variants = Some(to_set(variants));
        }
        config.validate()?;
        Ok(config)
    }
}

fn to_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

impl CommandLineConfig {
    pub fn shared(&self) -> &SharedArgs {
        match &self.source {
            SourceCommand::Criterion(args) => &args.shared,
            SourceCommand::Mimalloc(args) => &args.shared,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        let shared = self.shared();
        if shared.quiet {
            Verbosity::Quiet
        } else if shared.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    pub fn into_request(self) -> Result<ReportRequest, BenchTrackError> {
        match self.source {
            SourceCommand::Criterion(args) => {
                let base = match (args.base, args.base_json) {
                    (Some(dir), _) => BaseInput::Directory(dir),
                    (None, Some(path)) => BaseInput::Snapshot(path),
                    (None, None) => BaseInput::Absent,
                };
                Ok(ReportRequest {
                    source: Source::Criterion {
                        collector: CriterionCollector::new(&args.head)
                            .with_statistic(args.statistic),
                        base,
                    },
                    outputs: args.shared.outputs(),
                    config: args.shared.resolve_config(ReportConfig::criterion())?,
                })
            }
            SourceCommand::Mimalloc(args) => {
                let mut config = args.shared.resolve_config(ReportConfig::mimalloc_bench())?;
                if let Some(suffix) = args.base_suffix {
                    config.base_suffix = suffix;
                }
                Ok(ReportRequest {
                    source: Source::MimallocLog {
                        collector: MimallocLogCollector::new(&args.log),
                    },
                    outputs: args.shared.outputs(),
                    config,
                })
            }
        }
    }
}
