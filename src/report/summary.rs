//! Run summary printed after the report is written

use crate::tracking::MatchStats;
use crate::tree::BuildStats;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Human,
    Json,
    None,
}

/// Outcome of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub org: String,
    pub course: String,
    pub report: PathBuf,
    pub events_written: usize,
    pub tree: BuildStats,
    pub log: MatchStats,
}

impl RunSummary {
    /// Render in the requested format; `None` for [`SummaryFormat::None`].
    pub fn render(&self, format: SummaryFormat) -> Result<Option<String>> {
        match format {
            SummaryFormat::Human => Ok(Some(format_summary_human(self))),
            SummaryFormat::Json => Ok(Some(format_summary_json(self)?)),
            SummaryFormat::None => Ok(None),
        }
    }
}

pub fn format_summary_human(summary: &RunSummary) -> String {
    let tree = &summary.tree;
    let log = &summary.log;

    let mut output = format!(
        "Course events for {}/{} -> {}\n",
        summary.org,
        summary.course,
        summary.report.display()
    );
    output.push_str(&"=".repeat(50));
    output.push('\n');

    let rows = [
        ("Store records", tree.records),
        ("Tree nodes", tree.nodes),
        ("Orphaned children", tree.orphaned_children),
        ("Invalid children", tree.invalid_children),
        ("Log lines", log.lines),
        ("Matched events", log.matched),
        ("Unmatched events", log.unmatched),
        ("Out of scope", log.out_of_scope),
        ("Ignored event types", log.ignored_events),
        ("Malformed lines", log.malformed_lines),
        ("Invalid identifiers", log.invalid_identifiers),
    ];
    for (label, count) in rows {
        let _ = writeln!(output, "{:<30} {:>8}", label, count);
    }

    if !log.by_action.is_empty() {
        output.push_str("\nMatched by action\n");
        for (action, count) in &log.by_action {
            let _ = writeln!(output, "  {:<28} {:>8}", action, count);
        }
    }

    let details: Vec<_> = tree
        .diagnostics
        .details
        .iter()
        .chain(&log.diagnostics.details)
        .collect();
    if !details.is_empty() {
        output.push_str("\nDiagnostics\n");
        for detail in details {
            let _ = writeln!(output, "  {}", detail);
        }
        let suppressed = tree.diagnostics.suppressed() + log.diagnostics.suppressed();
        if suppressed > 0 {
            let _ = writeln!(output, "  ... and {} more", suppressed);
        }
    }

    output.push_str(&"=".repeat(50));
    output.push('\n');
    let _ = writeln!(output, "Events written: {}", summary.events_written);
    output
}

pub fn format_summary_json(summary: &RunSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
