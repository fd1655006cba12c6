//! Output formatters. Each renderer is an independent sink over the
//! collected and compared data.

pub mod chart;
pub mod dashboard;
pub mod markdown;
#[cfg(feature = "svg-charts")]
pub mod svg;

pub use chart::{ChartBackend, ChartLayout, ChartSpec, build_chart_specs, generate_charts};
pub use dashboard::{BmfMeasure, DashboardEntry, to_bmf_json, to_dashboard_json};
pub use markdown::render_comparison;

/// The image backend compiled into this build, if any.
pub fn default_backend() -> Option<Box<dyn ChartBackend>> {
    #[cfg(feature = "svg-charts")]
    {
        Some(Box::new(svg::SvgBackend::default()))
    }
    #[cfg(not(feature = "svg-charts"))]
    {
        None
    }
}
