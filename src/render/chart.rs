//! Chart data bridge: decides layout, scale and styling per benchmark group
//! and hands the result to an image backend.
//!
//! The drawing itself lives behind [`ChartBackend`]. This module owns what
//! gets drawn: which variants, in which order, on which axis, in which unit.

use std::{fmt::Write as _, fs, path::Path};

use tracing::{debug, info, warn};

use crate::{
    BenchTrackError,
    config::ReportConfig,
    reshape::{self, GroupedSeries, ParamSeries},
    units::{TimeScale, auto_scale},
};

/// Max/min ratio above which a clustered chart switches to a log y-axis.
pub const LOG_SCALE_RATIO: f64 = 10.0;
pub const INDEX_FILE: &str = "index.html";

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub variant: String,
    pub label: String,
    pub color: String,
    /// Value already divided by the chart's scale.
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub variant: String,
    pub label: String,
    pub color: String,
    /// One scaled value per category; `None` where the variant has no run.
    pub values: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartLayout {
    /// One bar per variant.
    Single { bars: Vec<Bar> },
    /// Parameters on the x-axis, one bar per variant inside each cluster.
    Clustered {
        categories: Vec<String>,
        x_label: String,
        series: Vec<Series>,
        log_scale: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub group: String,
    pub title: String,
    pub y_label: String,
    pub scale: TimeScale,
    pub layout: ChartLayout,
}

impl ChartSpec {
    pub fn file_stem(&self) -> &str {
        &self.group
    }
}

/// An image-producing capability.
pub trait ChartBackend {
    /// File extension of produced artifacts, without the dot.
    fn extension(&self) -> &str;

    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, BenchTrackError>;
}

/// `single_alloc_dealloc` -> `Single Alloc Dealloc`.
pub fn title_case(group: &str) -> String {
    let mut out = String::with_capacity(group.len());
    let mut prev_cased = false;
    for ch in group.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_cased {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(ch);
            prev_cased = false;
        }
    }
    out
}

fn y_label(scale: &TimeScale) -> String {
    format!("Time ({})", scale.label)
}

pub fn build_chart_specs(grouped: &GroupedSeries, config: &ReportConfig) -> Vec<ChartSpec> {
    grouped
        .groups()
        .filter_map(|(group, series)| build_chart_spec(group, series, config))
        .collect()
}

pub fn build_chart_spec(
    group: &str,
    series: &ParamSeries,
    config: &ReportConfig,
) -> Option<ChartSpec> {
    let variants =
        reshape::ordered_variants(reshape::variants_of(series), &config.display_order);
    if variants.is_empty() {
        return None;
    }
    let spec = if reshape::is_parameterized(series) {
        clustered_spec(group, series, &variants, config)
    } else {
        single_spec(group, series, &variants, config)
    };
    Some(spec)
}

fn single_spec(
    group: &str,
    series: &ParamSeries,
    variants: &[String],
    config: &ReportConfig,
) -> ChartSpec {
    let values = series.values().next();
    let raw: Vec<f64> = variants
        .iter()
        .map(|v| values.and_then(|m| m.get(v)).copied().unwrap_or(0.0))
        .collect();
    let positive: Vec<f64> = raw.iter().copied().filter(|v| *v > 0.0).collect();
    let scale = auto_scale(config.profile.unit, &positive);
    let bars = variants
        .iter()
        .zip(raw)
        .map(|(variant, value)| Bar {
            variant: variant.clone(),
            label: config.label_for(variant).to_string(),
            color: config.color_for(variant).to_string(),
            value: scale.apply(value),
        })
        .collect();
    ChartSpec {
        group: group.to_string(),
        title: title_case(group),
        y_label: y_label(&scale),
        scale,
        layout: ChartLayout::Single { bars },
    }
}

fn clustered_spec(
    group: &str,
    series: &ParamSeries,
    variants: &[String],
    config: &ReportConfig,
) -> ChartSpec {
    let present: Vec<f64> = series.values().flat_map(|m| m.values().copied()).collect();
    let scale = auto_scale(config.profile.unit, &present);
    let categories = series
        .keys()
        .map(|k| k.as_str().unwrap_or(group).to_string())
        .collect();
    let chart_series = variants
        .iter()
        .map(|variant| Series {
            variant: variant.clone(),
            label: config.label_for(variant).to_string(),
            color: config.color_for(variant).to_string(),
            values: series
                .values()
                .map(|m| m.get(variant).map(|v| scale.apply(*v)))
                .collect(),
        })
        .collect();
    ChartSpec {
        group: group.to_string(),
        title: title_case(group),
        y_label: y_label(&scale),
        scale,
        layout: ChartLayout::Clustered {
            categories,
            x_label: config.x_axis_label(group).to_string(),
            series: chart_series,
            log_scale: wants_log_scale(&present),
        },
    }
}

fn wants_log_scale(values: &[f64]) -> bool {
    let max = values.iter().copied().fold(f64::NAN, f64::max);
    let min = values.iter().copied().fold(f64::NAN, f64::min);
    if max.is_nan() || min.is_nan() {
        return false;
    }
    max / min.max(1e-9) > LOG_SCALE_RATIO
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// HTML page embedding every chart artifact, in file name order.
pub fn render_index(artifacts: &[String], title: &str) -> String {
    let mut sorted: Vec<&String> = artifacts.iter().collect();
    sorted.sort();
    let title = escape_html(title);
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html><head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "<style>");
    let _ = writeln!(
        html,
        "  body {{ font-family: system-ui, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; background: #fafafa; }}"
    );
    let _ = writeln!(html, "  h1 {{ color: #333; }}");
    let _ = writeln!(
        html,
        "  .chart {{ background: white; border: 1px solid #ddd; border-radius: 8px; padding: 16px; margin: 24px 0; }}"
    );
    let _ = writeln!(html, "  .chart img {{ width: 100%; height: auto; }}");
    let _ = writeln!(html, "</style>");
    let _ = writeln!(html, "</head><body>");
    let _ = writeln!(html, "<h1>{title}</h1>");
    for file in sorted {
        let stem = file.rsplit_once('.').map_or(file.as_str(), |(stem, _)| stem);
        let heading = escape_html(&title_case(stem));
        let src = escape_html(file);
        let _ = writeln!(
            html,
            "<div class=\"chart\"><h2>{heading}</h2><img src=\"{src}\" alt=\"{heading}\"></div>"
        );
    }
    html.push_str("</body></html>");
    html
}

/// Renders one artifact per group plus the index page into `output_dir`.
/// Returns the written file names, index last.
///
/// A group that fails to render or write is skipped; the index still lists
/// the others and the failures are reported once everything is written.
pub fn generate_charts(
    grouped: &GroupedSeries,
    config: &ReportConfig,
    backend: Option<&dyn ChartBackend>,
    output_dir: &Path,
) -> Result<Vec<String>, BenchTrackError> {
    let backend = backend.ok_or_else(|| {
        BenchTrackError::backend_unavailable("no image backend compiled in, skipping charts")
    })?;
    fs::create_dir_all(output_dir).map_err(|e| BenchTrackError::io(e.to_string()))?;

    let mut generated = Vec::new();
    let mut failed: Vec<(String, BenchTrackError)> = Vec::new();
    for spec in build_chart_specs(grouped, config) {
        let file = format!("{}.{}", spec.file_stem(), backend.extension());
        let written = backend.render(&spec).and_then(|bytes| {
            fs::write(output_dir.join(&file), bytes)
                .map_err(|e| BenchTrackError::io(format!("{file}: {e}")))
        });
        match written {
            Ok(()) => {
                debug!(file = %file, "chart written");
                generated.push(file);
            }
            Err(err) => {
                warn!(group = %spec.group, "skipping chart: {err}");
                failed.push((spec.group, err));
            }
        }
    }

    let attempted = generated.len() + failed.len();
    let index = render_index(&generated, &config.charts_title);
    fs::write(output_dir.join(INDEX_FILE), index)
        .map_err(|e| BenchTrackError::io(e.to_string()))?;
    generated.push(INDEX_FILE.to_string());
    info!(
        count = generated.len(),
        dir = %output_dir.display(),
        "generated chart files"
    );
    match failed.first() {
        None => Ok(generated),
        Some((group, err)) => Err(BenchTrackError::render(format!(
            "{} of {} charts failed, first {group}: {err}",
            failed.len(),
            attempted
        ))),
    }
}
