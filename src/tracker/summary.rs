//! Per-run outcome counters and the final report.

use std::fmt::Write;

/// Counts of what happened to each record in a run.
///
/// Owned by the batch driver and returned when the batch finishes. Once every
/// record has been accounted for, `total == created + updated + skipped + failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records in the batch.
    pub total: usize,
    /// New issues created.
    pub created: usize,
    /// Existing issues that received a comment.
    pub updated: usize,
    /// Records not filed (missing report, or dry run).
    pub skipped: usize,
    /// Records that failed.
    pub failed: usize,
    /// `(subject, message)` for every failure, in processing order.
    pub errors: Vec<(String, String)>,
    /// Actions a dry run would have taken, in processing order.
    pub planned: Vec<String>,
}

impl RunStats {
    /// Starts counting a batch of `total` records.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Counts a newly created issue.
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    /// Counts a comment appended to an existing issue.
    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    /// Counts a record that was not filed.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Counts a dry-run record and remembers what would have been done.
    pub fn record_planned(&mut self, action: impl Into<String>) {
        self.skipped += 1;
        self.planned.push(action.into());
    }

    /// Counts a failed record with its error message.
    pub fn record_failure(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push((subject.into(), message.into()));
    }

    /// Records accounted for so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }

    /// Returns `true` when every record of the batch has been accounted for.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }

    /// Returns `true` if any record failed; the process should exit non-zero.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Renders the categorized summary printed at the end of a run.
    #[must_use]
    pub fn format_summary(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "📊 SUMMARY");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "✅ Created: {}", self.created);
        let _ = writeln!(out, "🔄 Updated: {}", self.updated);
        let _ = writeln!(out, "⚠️  Skipped: {}", self.skipped);
        let _ = writeln!(out, "❌ Failed: {}", self.failed);
        let _ = writeln!(out, "📝 Total: {}", self.total);

        if !self.planned.is_empty() {
            let _ = writeln!(out, "\n🔍 Planned actions (dry run, {}):", self.planned.len());
            for action in &self.planned {
                let _ = writeln!(out, "  - {action}");
            }
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "\n❌ Errors encountered ({}):", self.errors.len());
            for (idx, (subject, message)) in self.errors.iter().enumerate() {
                let _ = writeln!(out, "  {}. {subject}", idx + 1);
                let _ = writeln!(out, "     Error: {message}");
            }
        }
        out
    }
}
