//! Pure formatting functions for UI output.
//!
//! Everything here returns strings so it can be tested without a terminal.

use crate::analyzer::{CommitAnalysis, ResolvedVersion};
use console::style;

/// Maximum number of changelog lines shown in the summary
const PREVIEW_LINES: usize = 10;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_warning(message: &str) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), message)
}

/// Summary of an analyzed range: counts and the first changelog lines.
pub fn format_analysis(analysis: &CommitAnalysis) -> String {
    let mut out = format!(
        "{}\n  {} raw commit(s), {} change(s), {} task(s), {} pull request(s)",
        style("Changes").bold(),
        analysis.raw_count,
        analysis.changelog.changes.len(),
        analysis.references.tasks.len(),
        analysis.references.pull_requests.len()
    );

    let lines: Vec<&str> = analysis.changelog.markdown.lines().collect();
    for line in lines.iter().take(PREVIEW_LINES) {
        out.push_str("\n  ");
        out.push_str(line);
    }
    if lines.len() > PREVIEW_LINES {
        out.push_str(&format!("\n  ... and {} more lines", lines.len() - PREVIEW_LINES));
    }
    out
}

/// Show either "From -> To" or the initial tag.
pub fn format_version_change(resolved: &ResolvedVersion) -> String {
    match &resolved.previous_tag {
        Some(previous) => format!(
            "{}\n  From: {}\n  To:   {} ({})",
            style("Version").bold(),
            style(previous).red(),
            style(&resolved.new_tag).green(),
            resolved.release_type
        ),
        None => format!(
            "{}\n  New tag: {} ({})",
            style("Initial Version").bold(),
            style(&resolved.new_tag).green(),
            resolved.release_type
        ),
    }
}
