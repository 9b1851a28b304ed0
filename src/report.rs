//! Reading the analysis summary and per-file detail reports.
//!
//! The summary lists one flagged file per warning line:
//!
//! ```text
//! ⚠️  src/audio/engine.cpp: High Complexity (3 functions over threshold)
//! ```
//!
//! Each flagged file has a detail report named
//! `refactoring-report-<sanitized path>.txt` in the results directory.

use std::path::{Path, PathBuf};

use crate::ports::FileSystem;

/// Warning marker that starts every flagged line in the summary.
const WARNING_MARKER: &str = "\u{26a0}";

/// Emoji presentation selector that usually follows the marker.
const VARIATION_SELECTOR: char = '\u{fe0f}';

/// One flagged file, ready to be filed against the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRecord {
    /// The flagged source file.
    pub subject: String,
    /// One-line description of what was detected.
    pub description: String,
    /// Full detail report, embedded verbatim in the issue.
    pub detail: String,
}

/// One warning line of the summary, before its detail report is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// The flagged source file.
    pub subject: String,
    /// One-line description of what was detected.
    pub description: String,
}

/// A summary entry after looking for its detail report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportItem {
    /// The detail report was found; the record can be filed.
    Ready(WarningRecord),
    /// No (or an empty) detail report; the entry is skipped.
    Missing {
        /// The flagged source file.
        subject: String,
        /// Where the report was expected.
        report_path: PathBuf,
    },
    /// The detail report exists but could not be read; the entry fails.
    Unreadable {
        /// The flagged source file.
        subject: String,
        /// The report that failed to read.
        report_path: PathBuf,
        /// The read error.
        error: String,
    },
}

/// Parses the warning lines of a summary; all other lines are ignored.
#[must_use]
pub fn parse_summary(content: &str) -> Vec<SummaryEntry> {
    content.lines().filter_map(parse_warning_line).collect()
}

fn parse_warning_line(line: &str) -> Option<SummaryEntry> {
    let rest = line.strip_prefix(WARNING_MARKER)?;
    let rest = rest.strip_prefix(VARIATION_SELECTOR).unwrap_or(rest);
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (subject, description) = rest.split_once(':')?;
    let subject = subject.trim();
    if subject.is_empty() || description.is_empty() {
        return None;
    }
    Some(SummaryEntry {
        subject: subject.to_string(),
        description: description.trim().to_string(),
    })
}

/// Path of the detail report for `subject` inside `results_dir`.
///
/// Path separators and dots are replaced by dashes, matching the scanner that
/// writes the reports.
#[must_use]
pub fn report_path(results_dir: &Path, subject: &str) -> PathBuf {
    let sanitized = subject.replace(['/', '.'], "-");
    results_dir.join(format!("refactoring-report-{sanitized}.txt"))
}

/// Reads the summary and pairs each entry with its detail report.
///
/// # Errors
///
/// Returns an error if the summary file cannot be read.
pub fn load_items(
    fs: &dyn FileSystem,
    summary_path: &Path,
    results_dir: &Path,
) -> Result<Vec<ReportItem>, String> {
    let content = fs
        .read_to_string(summary_path)
        .map_err(|e| format!("Failed to read summary file {}: {e}", summary_path.display()))?;

    let items = parse_summary(&content)
        .into_iter()
        .map(|entry| {
            let path = report_path(results_dir, &entry.subject);
            load_item(fs, entry, path)
        })
        .collect();
    Ok(items)
}

fn load_item(fs: &dyn FileSystem, entry: SummaryEntry, path: PathBuf) -> ReportItem {
    if !fs.exists(&path) {
        return ReportItem::Missing {
            subject: entry.subject,
            report_path: path,
        };
    }
    match fs.read_to_string(&path) {
        Ok(detail) if detail.trim().is_empty() => ReportItem::Missing {
            subject: entry.subject,
            report_path: path,
        },
        Ok(detail) => ReportItem::Ready(WarningRecord {
            subject: entry.subject,
            description: entry.description,
            detail,
        }),
        Err(e) => ReportItem::Unreadable {
            subject: entry.subject,
            report_path: path,
            error: e.to_string(),
        },
    }
}
