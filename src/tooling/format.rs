//! Format run summaries as text.

use crate::dump::DumpStats;
use crate::probe::{ProbeReport, ProbeState};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format a probing run report.
pub fn format_probe_summary(report: &ProbeReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Probe run")));
    let outcome = match report.state {
        ProbeState::Done => "all agents finished".to_string(),
        ProbeState::TimedOut => "nothing received in time".to_string(),
        other => other.to_string(),
    };
    out.push_str(&format!("  Outcome: {}\n", outcome));
    out.push_str(&format!("  Targets: {}\n", report.targets));
    out.push_str(&format!("  Agents: {}\n", report.agents.len()));
    out.push_str(&format!(
        "  Commands issued: {} ({} failed)\n",
        report.commands_issued, report.command_failures
    ));
    out.push_str(&format!("  Results written: {}\n", report.results));
    if report.dropped > 0 {
        out.push_str(&format!("  Results dropped: {}\n", report.dropped));
    }
    if report.poll_errors > 0 {
        out.push_str(&format!("  Poll errors: {}\n", report.poll_errors));
    }
    if report.agents.is_empty() {
        out.push_str("\nNo agents took part.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Agent", "Issued", "Received", "Rounds", "Finished"]);
    for row in &report.agents {
        table.add_row(vec![
            row.agent_id.clone(),
            row.issued.to_string(),
            row.received.to_string(),
            row.rounds_completed.to_string(),
            if row.finished { "yes" } else { "no" }.to_string(),
        ]);
    }
    out.push_str(&format!("\n{}\n", table));
    out
}

/// Format a dump summary.
pub fn format_dump_summary(output: &Path, stats: &DumpStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Dump")));
    out.push_str(&format!("  Output: {}\n", output.display()));
    out.push_str(&format!(
        "  Files: {} converted, {} skipped\n",
        stats.files, stats.skipped_files
    ));
    out.push_str(&format!(
        "  Traces: {} ({} completed, {} incomplete)\n",
        stats.records, stats.completed, stats.incomplete
    ));
    out
}
