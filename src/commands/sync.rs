//! `issue-upsert sync` command.

use std::path::Path;

use tracing::debug;

use crate::config::{RunOptions, TrackerConfig};
use crate::context::ServiceContext;
use crate::report;
use crate::tracker::IssueUpserter;

/// Execute the `sync` command against the adapters in `ctx`.
///
/// Reads the summary, files every flagged record, and prints the run summary.
///
/// # Errors
///
/// Returns an error string if the summary cannot be read, the runtime cannot
/// start, or any record failed.
pub fn run_with_context(
    ctx: &ServiceContext,
    config: &TrackerConfig,
    options: &RunOptions,
    summary: &Path,
    results_dir: &Path,
) -> Result<(), String> {
    println!("📖 Reading summary from: {}", summary.display());
    let items = report::load_items(ctx.fs.as_ref(), summary, results_dir)?;

    if items.is_empty() {
        println!("✅ No files with refactoring opportunities found");
        return Ok(());
    }

    println!("Found {} files with refactoring opportunities", items.len());
    if options.dry_run {
        println!("🔍 DRY RUN MODE - No issues will be created or updated");
    }
    debug!(repository = %config.slug(), ?options, "starting sync");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let upserter = IssueUpserter::new(ctx, config, options);
    let stats = runtime.block_on(upserter.run(&items));

    println!("{}", stats.format_summary());

    if stats.has_failures() {
        return Err(format!("{} of {} records failed", stats.failed, stats.total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::adapters::replaying::{ReplayingClock, ReplayingSleeper, ReplayingTransport};
    use crate::cassette::format::Cassette;

    fn offline_context() -> ServiceContext {
        let cassette = Cassette::new("empty", "acme/widgets");
        ServiceContext::new(
            Box::new(ReplayingClock::from_cassette(&cassette)),
            Box::new(LiveFileSystem),
            Box::new(ReplayingTransport::from_cassette(&cassette)),
            Box::new(ReplayingSleeper::new()),
        )
    }

    #[test]
    fn missing_summary_is_an_error() {
        let ctx = offline_context();
        let config = TrackerConfig::for_repository("acme", "widgets");
        let result = run_with_context(
            &ctx,
            &config,
            &RunOptions::default(),
            Path::new("/nonexistent/summary.txt"),
            Path::new("/nonexistent/results"),
        );
        assert!(result.unwrap_err().contains("Failed to read summary file"));
    }

    #[test]
    fn summary_without_warnings_succeeds_without_requests() {
        let dir = std::env::temp_dir().join("issue_upsert_sync_empty_test");
        std::fs::create_dir_all(&dir).unwrap();
        let summary = dir.join("summary.txt");
        std::fs::write(&summary, "✅ src/main.cpp: OK\n").unwrap();

        let ctx = offline_context();
        let config = TrackerConfig::for_repository("acme", "widgets");
        let result = run_with_context(&ctx, &config, &RunOptions::default(), &summary, &dir);

        assert!(result.is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
