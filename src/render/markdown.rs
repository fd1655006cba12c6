//! Markdown comparison report for pull request comments.
//!
//! Output depends only on the entry sequence and the configuration, so
//! rendering the same comparison twice yields identical bytes.

use std::collections::BTreeMap;

use crate::{
    compare::{ComparisonEntry, ComparisonSummary},
    config::ReportConfig,
    name,
    units::format_value,
};

const REGRESSED_MARK: &str = "\u{26a0}\u{fe0f}";
const IMPROVED_MARK: &str = "\u{2705}";

pub fn render_comparison(entries: &[ComparisonEntry], config: &ReportConfig) -> String {
    let mut lines: Vec<String> = vec![format!("## {}\n", config.report_title)];

    let summary = ComparisonSummary::from_entries(entries, |variant| config.is_tracked(variant));
    lines.push(summary_line(&summary, config));
    lines.push(verdict_line(&summary, config));

    lines.push("<details><summary>Full results</summary>\n".to_string());
    for (group, rows) in grouped_rows(entries) {
        lines.push(format!("### {group}\n"));
        lines.push("| Allocator | Param | Base | Head | Change |".to_string());
        lines.push("|-----------|-------|-----:|-----:|-------:|".to_string());
        for (full, base, head, change) in rows {
            let parsed = name::decompose(full);
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                parsed.variant(),
                parsed.parameter().unwrap_or("-"),
                format_value(config.profile.unit, base),
                format_value(config.profile.unit, head),
                change_cell(change, config.threshold),
            ));
        }
        lines.push(String::new());
    }

    let added: Vec<&ComparisonEntry> = entries
        .iter()
        .filter(|e| matches!(e, ComparisonEntry::New { .. }))
        .collect();
    if !added.is_empty() {
        lines.push("### New benchmarks\n".to_string());
        for entry in added {
            if let ComparisonEntry::New { name, head } = entry {
                lines.push(format!(
                    "- **{name}**: {}",
                    format_value(config.profile.unit, *head)
                ));
            }
        }
        lines.push(String::new());
    }

    let removed: Vec<&str> = entries
        .iter()
        .filter(|e| matches!(e, ComparisonEntry::Removed { .. }))
        .map(ComparisonEntry::name)
        .collect();
    if !removed.is_empty() {
        lines.push("### Removed benchmarks\n".to_string());
        lines.extend(removed.into_iter().map(|name| format!("- ~~{name}~~")));
        lines.push(String::new());
    }

    lines.push("</details>".to_string());
    lines.join("\n")
}

fn summary_line(summary: &ComparisonSummary, config: &ReportConfig) -> String {
    let mut line = format!("**{}:** ", config.tracked_heading);
    if summary.improved > 0 {
        line.push_str(&format!("{IMPROVED_MARK} {} improved, ", summary.improved));
    }
    if summary.regressed > 0 {
        line.push_str(&format!("{REGRESSED_MARK} {} regressed, ", summary.regressed));
    }
    line.push_str(&format!(
        "{} unchanged (>{}% threshold)\n",
        summary.unchanged,
        config.threshold_percent()
    ));
    line
}

fn verdict_line(summary: &ComparisonSummary, config: &ReportConfig) -> String {
    if summary.regressed > 0 {
        format!(
            "> {REGRESSED_MARK} **Performance regressions detected in {}.** Please review below.\n",
            config.tracked_heading
        )
    } else if summary.improved > 0 {
        format!("> {IMPROVED_MARK} **Performance improvements detected!**\n")
    } else {
        format!("> No significant changes in {}.\n", config.tracked_heading)
    }
}

type Row<'a> = (&'a str, f64, f64, f64);

/// Paired entries by group, each group sorted by full name.
fn grouped_rows(entries: &[ComparisonEntry]) -> BTreeMap<&str, Vec<Row<'_>>> {
    let mut groups: BTreeMap<&str, Vec<Row<'_>>> = BTreeMap::new();
    for entry in entries {
        let Some((base, head, change)) = entry.paired() else {
            continue;
        };
        let full = entry.name();
        groups
            .entry(name::decompose(full).group())
            .or_default()
            .push((full, base, head, change));
    }
    for rows in groups.values_mut() {
        rows.sort_by(|a, b| a.0.cmp(b.0));
    }
    groups
}

/// `+6.0% ⚠️` style cell; the marker appears only past the threshold.
pub fn change_cell(change: f64, threshold: f64) -> String {
    let mut cell = format!("{:+.1}%", change * 100.0);
    if change > threshold {
        cell.push(' ');
        cell.push_str(REGRESSED_MARK);
    } else if change < -threshold {
        cell.push(' ');
        cell.push_str(IMPROVED_MARK);
    }
    cell
}
