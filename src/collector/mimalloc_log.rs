use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::Collection;
use crate::mapping::CanonicalMapping;

const MIN_FIELDS: usize = 6;

static ELAPSED_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+):)?(\d+(?:\.\d+)?)").ok());

/// One data line of the log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogRecord {
    pub benchmark: String,
    pub allocator: String,
    /// Wall-clock seconds.
    pub elapsed: f64,
    pub rss_kb: u64,
    pub user: f64,
    pub sys: f64,
}

impl LogRecord {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.benchmark, self.allocator)
    }
}

/// Records parsed from a log plus the number of data lines dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogParse {
    pub records: Vec<LogRecord>,
    pub skipped: usize,
}

/// Parses `83.45` or `1:23.45` into seconds.
pub fn parse_elapsed(field: &str) -> Option<f64> {
    let re = ELAPSED_RE.as_ref()?;
    let caps = re.captures(field.trim())?;
    let minutes = match caps.get(1) {
        Some(m) => m.as_str().parse::<u64>().ok()?,
        None => 0,
    };
    let seconds = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(minutes as f64 * 60.0 + seconds)
}

fn parse_count(field: &str) -> u64 {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    field.parse().unwrap_or(0)
}

fn parse_seconds(field: &str) -> f64 {
    let numeric = field.bytes().any(|b| b.is_ascii_digit())
        && field.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if !numeric {
        return 0.0;
    }
    field.parse().unwrap_or(0.0)
}

/// Parses one line. `None` for comments, blanks and unusable lines; the
/// caller tells them apart with [`is_data_line`].
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS || fields[0].starts_with('#') {
        return None;
    }
    Some(LogRecord {
        benchmark: fields[0].to_string(),
        allocator: fields[1].to_string(),
        elapsed: parse_elapsed(fields[2])?,
        rss_kb: parse_count(fields[3]),
        user: parse_seconds(fields[4]),
        sys: parse_seconds(fields[5]),
    })
}

pub fn is_data_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

pub fn parse_log(text: &str) -> LogParse {
    let mut parsed = LogParse::default();
    for line in text.lines().filter(|l| is_data_line(l)) {
        match parse_line(line) {
            Some(record) => parsed.records.push(record),
            None => {
                debug!(line, "skipping malformed log line");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Keys each record as `benchmark/allocator`; later lines win.
pub fn records_to_mapping(records: &[LogRecord]) -> CanonicalMapping {
    records
        .iter()
        .map(|r| (r.full_name(), r.elapsed))
        .collect()
}

/// Reads a whitespace-delimited benchmark log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimallocLogCollector {
    path: PathBuf,
}

impl MimallocLogCollector {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn collect(&self) -> Collection {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "log unreadable");
                String::new()
            }
        };
        let parsed = parse_log(&text);
        Collection::finish(
            records_to_mapping(&parsed.records),
            parsed.skipped,
            &self.path,
        )
    }
}
