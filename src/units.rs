//! Unit handling and magnitude auto-scaling for time values.

use serde::{Deserialize, Serialize};

const NS_PER_US: f64 = 1_000.0;
const NS_PER_MS: f64 = 1_000_000.0;
const NS_PER_S: f64 = 1_000_000_000.0;

/// Native unit of the values in a canonical mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    /// Criterion point estimates.
    #[default]
    Nanoseconds,
    /// Wall-clock seconds from the line-record log.
    Seconds,
}

/// Divisor and label chosen for displaying a set of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub divisor: f64,
    pub label: &'static str,
}

impl TimeScale {
    pub const NANOS: TimeScale = TimeScale {
        divisor: 1.0,
        label: "ns",
    };
    pub const MICROS: TimeScale = TimeScale {
        divisor: NS_PER_US,
        label: "\u{00b5}s",
    };
    pub const MILLIS: TimeScale = TimeScale {
        divisor: NS_PER_MS,
        label: "ms",
    };
    pub const SECS: TimeScale = TimeScale {
        divisor: NS_PER_S,
        label: "s",
    };
    pub const WALL_SECONDS: TimeScale = TimeScale {
        divisor: 1.0,
        label: "seconds",
    };

    pub fn apply(&self, value: f64) -> f64 {
        value / self.divisor
    }
}

/// Picks the scale for a magnitude in nanoseconds. Each power of 1000 is
/// the first value of the next unit.
pub fn scale_for_nanos(ns: f64) -> TimeScale {
    if ns >= NS_PER_S {
        TimeScale::SECS
    } else if ns >= NS_PER_MS {
        TimeScale::MILLIS
    } else if ns >= NS_PER_US {
        TimeScale::MICROS
    } else {
        TimeScale::NANOS
    }
}

/// Chooses one display scale for a whole series from its largest value.
pub fn auto_scale(unit: MetricUnit, values: &[f64]) -> TimeScale {
    match unit {
        MetricUnit::Seconds => TimeScale::WALL_SECONDS,
        MetricUnit::Nanoseconds => {
            let max = values.iter().copied().fold(f64::NAN, f64::max);
            if max.is_nan() {
                TimeScale::NANOS
            } else {
                scale_for_nanos(max)
            }
        }
    }
}

/// Human-readable rendering of a single value, as used in report tables.
pub fn format_value(unit: MetricUnit, value: f64) -> String {
    match unit {
        MetricUnit::Seconds => format!("{value:.2}s"),
        MetricUnit::Nanoseconds => format_nanos(value),
    }
}

/// Table cell text for a nanosecond value. Uses an ASCII `us`.
pub fn format_nanos(ns: f64) -> String {
    let scale = scale_for_nanos(ns);
    if scale == TimeScale::NANOS {
        return format!("{ns:.1} ns");
    }
    let label = if scale == TimeScale::MICROS {
        "us"
    } else {
        scale.label
    };
    format!("{:.2} {label}", scale.apply(ns))
}

/// Rounds to `precision` decimal places for dashboard feeds.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}
