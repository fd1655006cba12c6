//! Minimal SVG bar chart backend.

use std::fmt::Write as _;

use super::chart::{Bar, ChartBackend, ChartLayout, ChartSpec, Series};
use crate::BenchTrackError;

const HEIGHT: f64 = 420.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 80.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const LEGEND_WIDTH: f64 = 150.0;
const Y_TICKS: usize = 5;

#[derive(Clone, Debug, Default)]
pub struct SvgBackend;

impl ChartBackend for SvgBackend {
    fn extension(&self) -> &str {
        "svg"
    }

    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, BenchTrackError> {
        let svg = match &spec.layout {
            ChartLayout::Single { bars } => single(spec, bars),
            ChartLayout::Clustered {
                categories,
                x_label,
                series,
                log_scale,
            } => clustered(spec, categories, x_label, series, *log_scale),
        };
        svg.map(String::into_bytes)
            .map_err(|e| BenchTrackError::render(format!("{}: {e}", spec.group)))
    }
}

/// Maps data values to pixel heights inside the plot area.
struct YAxis {
    min: f64,
    max: f64,
    log: bool,
    plot_height: f64,
}

impl YAxis {
    fn new<I: IntoIterator<Item = f64>>(values: I, log: bool) -> Self {
        let positive: Vec<f64> = values.into_iter().filter(|v| *v > 0.0).collect();
        let hi = positive.iter().copied().fold(0.0, f64::max);
        let lo = positive.iter().copied().fold(f64::INFINITY, f64::min);
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        if log && hi > 0.0 {
            Self {
                min: 10f64.powi(lo.log10().floor() as i32),
                max: 10f64.powi(hi.log10().ceil().max(lo.log10().floor() + 1.0) as i32),
                log: true,
                plot_height,
            }
        } else {
            Self {
                min: 0.0,
                max: if hi > 0.0 { hi * 1.1 } else { 1.0 },
                log: false,
                plot_height,
            }
        }
    }

    fn height_of(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return 0.0;
        }
        let frac = if self.log {
            (value.log10() - self.min.log10()) / (self.max.log10() - self.min.log10())
        } else {
            (value - self.min) / (self.max - self.min)
        };
        frac.clamp(0.0, 1.0) * self.plot_height
    }

    fn ticks(&self) -> Vec<f64> {
        if self.log {
            let first = self.min.log10().round() as i32;
            let last = self.max.log10().round() as i32;
            (first..=last).map(|e| 10f64.powi(e)).collect()
        } else {
            (0..=Y_TICKS)
                .map(|i| self.min + (self.max - self.min) * i as f64 / Y_TICKS as f64)
                .collect()
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn tick_label(value: f64) -> String {
    if value >= 100.0 || value == 0.0 {
        format!("{value:.0}")
    } else if value >= 1.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

fn open(out: &mut String, width: f64, spec: &ChartSpec) -> std::fmt::Result {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{HEIGHT:.0}\" viewBox=\"0 0 {width:.0} {HEIGHT:.0}\" font-family=\"sans-serif\">"
    )?;
    writeln!(out, "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>")?;
    writeln!(
        out,
        "<text x=\"{:.1}\" y=\"26\" text-anchor=\"middle\" font-size=\"15\" font-weight=\"bold\">{}</text>",
        width / 2.0,
        escape(&spec.title)
    )
}

fn axes(out: &mut String, axis: &YAxis, plot_right: f64, y_label: &str) -> std::fmt::Result {
    let bottom = HEIGHT - MARGIN_BOTTOM;
    for tick in axis.ticks() {
        let y = bottom - axis.height_of(tick);
        writeln!(
            out,
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{plot_right:.1}\" y2=\"{y:.1}\" stroke=\"#dddddd\" stroke-dasharray=\"4 3\"/>"
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\">{}</text>",
            MARGIN_LEFT - 6.0,
            y + 3.0,
            tick_label(tick)
        )?;
    }
    writeln!(
        out,
        "<line x1=\"{MARGIN_LEFT}\" y1=\"{bottom}\" x2=\"{plot_right:.1}\" y2=\"{bottom}\" stroke=\"#333333\"/>"
    )?;
    writeln!(
        out,
        "<text transform=\"translate(18 {:.1}) rotate(-90)\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
        MARGIN_TOP + axis.plot_height / 2.0,
        escape(y_label)
    )
}

fn single(spec: &ChartSpec, bars: &[Bar]) -> Result<String, std::fmt::Error> {
    let slot = 90.0;
    let width = (bars.len() as f64 * slot + MARGIN_LEFT + MARGIN_RIGHT).max(480.0);
    let plot_right = width - MARGIN_RIGHT;
    let slot = (plot_right - MARGIN_LEFT) / bars.len().max(1) as f64;
    let axis = YAxis::new(bars.iter().map(|b| b.value), false);
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut out = String::new();
    open(&mut out, width, spec)?;
    axes(&mut out, &axis, plot_right, &spec.y_label)?;
    for (i, bar) in bars.iter().enumerate() {
        let h = axis.height_of(bar.value);
        let x = MARGIN_LEFT + slot * i as f64 + slot * 0.2;
        let w = slot * 0.6;
        writeln!(
            out,
            "<rect x=\"{x:.1}\" y=\"{:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" fill=\"{}\" stroke=\"white\"/>",
            bottom - h,
            escape(&bar.color)
        )?;
        if bar.value > 0.0 {
            writeln!(
                out,
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"9\" fill=\"#333333\">{:.1}</text>",
                x + w / 2.0,
                bottom - h - 3.0,
                bar.value
            )?;
        }
        let cx = x + w / 2.0;
        writeln!(
            out,
            "<text transform=\"translate({cx:.1} {:.1}) rotate(-30)\" text-anchor=\"end\" font-size=\"10\">{}</text>",
            bottom + 14.0,
            escape(&bar.label)
        )?;
    }
    out.push_str("</svg>\n");
    Ok(out)
}

fn clustered(
    spec: &ChartSpec,
    categories: &[String],
    x_label: &str,
    series: &[Series],
    log_scale: bool,
) -> Result<String, std::fmt::Error> {
    let n_series = series.len().max(1) as f64;
    let cluster = n_series * 24.0 + 32.0;
    let width = (categories.len() as f64 * cluster + MARGIN_LEFT + MARGIN_RIGHT + LEGEND_WIDTH)
        .clamp(640.0, 1600.0);
    let plot_right = width - MARGIN_RIGHT - LEGEND_WIDTH;
    let cluster = (plot_right - MARGIN_LEFT) / categories.len().max(1) as f64;
    let bar_width = cluster * 0.8 / n_series;
    let axis = YAxis::new(
        series.iter().flat_map(|s| s.values.iter().flatten().copied()),
        log_scale,
    );
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut out = String::new();
    open(&mut out, width, spec)?;
    axes(&mut out, &axis, plot_right, &spec.y_label)?;
    for (ci, category) in categories.iter().enumerate() {
        let left = MARGIN_LEFT + cluster * ci as f64 + cluster * 0.1;
        for (si, s) in series.iter().enumerate() {
            let Some(value) = s.values.get(ci).copied().flatten() else {
                continue;
            };
            let h = axis.height_of(value);
            writeln!(
                out,
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{bar_width:.1}\" height=\"{h:.1}\" fill=\"{}\" stroke=\"white\" stroke-width=\"0.3\"/>",
                left + bar_width * si as f64,
                bottom - h,
                escape(&s.color)
            )?;
        }
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"10\">{}</text>",
            MARGIN_LEFT + cluster * (ci as f64 + 0.5),
            bottom + 16.0,
            escape(category)
        )?;
    }
    writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
        (MARGIN_LEFT + plot_right) / 2.0,
        HEIGHT - 24.0,
        escape(x_label)
    )?;
    let legend_x = plot_right + 16.0;
    for (si, s) in series.iter().enumerate() {
        let y = MARGIN_TOP + 16.0 * si as f64;
        writeln!(
            out,
            "<rect x=\"{legend_x:.1}\" y=\"{y:.1}\" width=\"10\" height=\"10\" fill=\"{}\"/>",
            escape(&s.color)
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{}</text>",
            legend_x + 14.0,
            y + 9.0,
            escape(&s.label)
        )?;
    }
    out.push_str("</svg>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::TimeScale;

    fn spec(layout: ChartLayout) -> ChartSpec {
        ChartSpec {
            group: "churn".into(),
            title: "Churn".into(),
            y_label: "Time (ns)".into(),
            scale: TimeScale::NANOS,
            layout,
        }
    }

    #[test]
    fn test_single_chart_draws_every_bar() {
        let bars = vec![
            Bar {
                variant: "system".into(),
                label: "system".into(),
                color: "#888888".into(),
                value: 12.0,
            },
            Bar {
                variant: "rt_std".into(),
                label: "rt (std)".into(),
                color: "#9467bd".into(),
                value: 8.0,
            },
        ];
        let bytes = SvgBackend.render(&spec(ChartLayout::Single { bars })).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("#9467bd"));
        assert!(svg.contains("rt (std)"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_log_axis_spans_decades() {
        let axis = YAxis::new([5.0, 500.0], true);
        assert_eq!(axis.min, 1.0);
        assert_eq!(axis.max, 1000.0);
        assert_eq!(axis.ticks().len(), 4);
    }
}
