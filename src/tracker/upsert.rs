//! Find-or-create per record, and the sequential batch driver.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::finder::IssueFinder;
use super::issue::{canonical_title, comment_body, issue_body, ISSUE_LABELS};
use super::retry::RetryExecutor;
use super::summary::RunStats;
use super::UpsertError;
use crate::config::{RunOptions, TrackerConfig};
use crate::context::ServiceContext;
use crate::ports::ApiRequest;
use crate::report::{ReportItem, WarningRecord};

#[derive(Deserialize)]
struct CreatedIssue {
    number: u64,
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new issue was created.
    Created(u64),
    /// A comment was appended to an existing issue.
    Updated(u64),
    /// Dry run: no match found, an issue would be created with this title.
    WouldCreate(String),
    /// Dry run: a comment would be appended to this issue.
    WouldComment(u64),
}

impl RecordOutcome {
    /// Progress line for this outcome.
    #[must_use]
    pub fn describe(&self, subject: &str) -> String {
        match self {
            Self::Created(number) => format!("✅ Created new issue #{number} for {subject}"),
            Self::Updated(number) => format!("✅ Updated existing issue #{number} for {subject}"),
            Self::WouldCreate(title) => format!("🔍 Would create issue: {title}"),
            Self::WouldComment(number) => {
                format!("🔍 Would comment on existing issue #{number} for {subject}")
            }
        }
    }
}

/// Files warning records against the tracker, one at a time.
pub struct IssueUpserter<'a> {
    ctx: &'a ServiceContext,
    owner: &'a str,
    repo: &'a str,
    options: &'a RunOptions,
    executor: RetryExecutor<'a>,
}

impl<'a> IssueUpserter<'a> {
    /// Creates an upserter for the repository in `config`.
    ///
    /// Retry backoff uses the inter-record delay as its base.
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        config: &'a TrackerConfig,
        options: &'a RunOptions,
    ) -> Self {
        let executor =
            RetryExecutor::new(ctx.sleeper.as_ref(), options.delay, options.max_attempts);
        Self {
            ctx,
            owner: &config.owner,
            repo: &config.repo,
            options,
            executor,
        }
    }

    /// Searches for the record's issue, then comments on it or creates it.
    ///
    /// In dry-run mode only the search is issued and the planned action is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an [`UpsertError`] for the first step that fails.
    pub async fn upsert(&self, record: &WarningRecord) -> Result<RecordOutcome, UpsertError> {
        let finder = IssueFinder::new(
            self.ctx.transport.as_ref(),
            &self.executor,
            self.owner,
            self.repo,
        );
        let existing = finder.find(&record.subject).await?;

        if self.options.dry_run {
            return Ok(match existing {
                Some(number) => RecordOutcome::WouldComment(number),
                None => RecordOutcome::WouldCreate(canonical_title(&record.subject)),
            });
        }

        let date = self.ctx.clock.now().format("%Y-%m-%d").to_string();
        match existing {
            Some(number) => {
                self.add_comment(number, &comment_body(record, &date)).await?;
                Ok(RecordOutcome::Updated(number))
            }
            None => {
                let title = canonical_title(&record.subject);
                let number = self.create_issue(&title, &issue_body(record, &date)).await?;
                Ok(RecordOutcome::Created(number))
            }
        }
    }

    async fn create_issue(&self, title: &str, body: &str) -> Result<u64, UpsertError> {
        let request = ApiRequest::post(
            format!("/repos/{}/{}/issues", self.owner, self.repo),
            json!({ "title": title, "body": body, "labels": ISSUE_LABELS }),
        );
        let payload = self
            .executor
            .execute(|| self.ctx.transport.send(&request))
            .await
            .map_err(UpsertError::Create)?;
        let created: CreatedIssue =
            serde_json::from_value(payload).map_err(|e| UpsertError::MalformedResponse {
                operation: "create",
                detail: e.to_string(),
            })?;
        Ok(created.number)
    }

    async fn add_comment(&self, number: u64, body: &str) -> Result<(), UpsertError> {
        let request = ApiRequest::post(
            format!("/repos/{}/{}/issues/{number}/comments", self.owner, self.repo),
            json!({ "body": body }),
        );
        self.executor
            .execute(|| self.ctx.transport.send(&request))
            .await
            .map_err(|source| UpsertError::Comment { number, source })?;
        Ok(())
    }

    /// Processes every item in order and returns the run's counters.
    ///
    /// A failing record is counted and the batch moves on. After a record
    /// succeeds the driver waits the inter-record delay; after a record fails
    /// on a persistent rate limit it waits the cooldown instead. No wait
    /// follows the last item.
    pub async fn run(&self, items: &[ReportItem]) -> RunStats {
        let count = items.len();
        let mut stats = RunStats::new(count);

        for (idx, item) in items.iter().enumerate() {
            let is_last = idx + 1 == count;
            println!("\nProcessing file {}/{count}...", idx + 1);

            let record = match item {
                ReportItem::Ready(record) => record,
                ReportItem::Missing { subject, report_path } => {
                    println!(
                        "⚠️  Skipping {subject} - no report file found at {}",
                        report_path.display()
                    );
                    stats.record_skipped();
                    continue;
                }
                ReportItem::Unreadable { subject, report_path, error } => {
                    let message =
                        format!("failed to read report {}: {error}", report_path.display());
                    println!("❌ Failed to process {subject}: {message}");
                    stats.record_failure(subject, message);
                    continue;
                }
            };

            println!("📄 Processing: {}", record.subject);
            match self.upsert(record).await {
                Ok(outcome) => {
                    println!("{}", outcome.describe(&record.subject));
                    match &outcome {
                        RecordOutcome::Created(_) => stats.record_created(),
                        RecordOutcome::Updated(_) => stats.record_updated(),
                        RecordOutcome::WouldCreate(title) => {
                            stats.record_planned(format!("create issue: {title}"));
                        }
                        RecordOutcome::WouldComment(number) => stats
                            .record_planned(format!("comment on #{number}: {}", record.subject)),
                    }
                    if !is_last {
                        self.pause(self.options.delay).await;
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    println!("❌ Failed to process {}: {message}", record.subject);
                    stats.record_failure(&record.subject, message);
                    if err.is_rate_limit() && !is_last {
                        warn!(
                            subject = %record.subject,
                            cooldown_secs = self.options.rate_limit_cooldown.as_secs_f64(),
                            "rate limit persists, cooling down"
                        );
                        self.pause(self.options.rate_limit_cooldown).await;
                    }
                }
            }
        }

        info!(
            total = stats.total,
            created = stats.created,
            updated = stats.updated,
            skipped = stats.skipped,
            failed = stats.failed,
            "batch finished"
        );
        stats
    }

    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        println!("⏳ Waiting {:.1}s before next request...", duration.as_secs_f64());
        self.ctx.sleeper.sleep(duration).await;
    }
}
