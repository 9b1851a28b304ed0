//! Canonical titles, search queries, and rendered bodies for tracker issues.

use std::fmt::Write;

use serde::Deserialize;

use crate::report::WarningRecord;

/// Prefix shared by every issue this tool manages.
pub const TITLE_PREFIX: &str = "[Refactoring]";

/// Labels an existing issue must carry to be considered ours.
pub const SEARCH_LABELS: [&str; 2] = ["refactoring", "automated"];

/// Labels attached to newly created issues.
pub const ISSUE_LABELS: [&str; 3] = ["refactoring", "automated", "technical-debt"];

/// An issue as returned by the tracker; only the fields we need.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerIssue {
    /// Issue number within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
}

/// The title an issue for `subject` is created with and matched by.
#[must_use]
pub fn canonical_title(subject: &str) -> String {
    format!("{TITLE_PREFIX} {subject}")
}

/// Search query narrowing candidates to open, labelled issues mentioning `subject` in the title.
///
/// Double quotes in `subject` would end the quoted phrase early, so they are
/// replaced by spaces in the query term.
#[must_use]
pub fn search_query(owner: &str, repo: &str, subject: &str) -> String {
    let mut query = format!("repo:{owner}/{repo} is:issue is:open");
    for label in SEARCH_LABELS {
        let _ = write!(query, " label:{label}");
    }
    let term = subject.replace('"', " ");
    let _ = write!(query, " in:title \"{}\"", term.trim());
    query
}

/// Wraps `text` in a code fence longer than any backtick run inside it.
fn fenced(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat((longest + 1).max(3));
    let newline = if text.ends_with('\n') { "" } else { "\n" };
    format!("{fence}\n{text}{newline}{fence}")
}

/// Body of a newly created issue.
#[must_use]
pub fn issue_body(record: &WarningRecord, date: &str) -> String {
    format!(
        "## Refactoring Opportunity: {subject}

This issue was automatically created by the refactoring scanner workflow.

### Issue Detected
{description}

### Analysis Date
{date}

### Detailed Analysis

{detail}

### Recommended Actions

Based on the issue type:
- **High Complexity**: Break down complex functions (cyclomatic complexity > 10) into smaller, more focused functions
- **Large File**: Consider splitting file over 500 lines into smaller, focused modules
- **High Coupling**: Review and reduce files with many internal dependencies (>10 includes)
- **Magic Numbers**: Replace literal numbers with named constants
- **God Object**: Consider splitting classes with 20+ methods into smaller, more focused classes

### Next Steps

1. Review the detailed analysis above
2. Plan refactoring approach
3. Create a branch for the refactoring work
4. Submit a PR with the improvements
5. Close this issue when complete

**Note**: This is an automated issue. Feel free to add comments, assign it, or close it if not applicable.
",
        subject = record.subject,
        description = record.description,
        detail = fenced(&record.detail),
    )
}

/// Body of the comment appended to an existing issue.
#[must_use]
pub fn comment_body(record: &WarningRecord, date: &str) -> String {
    format!(
        "## Updated Analysis - {date}

{description}

<details>
<summary>Click to expand updated report</summary>

{detail}

</details>",
        description = record.description,
        detail = fenced(&record.detail),
    )
}
