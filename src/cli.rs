//! CLI argument definitions.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::RunOptions;

/// Top-level CLI parser for `issue-upsert`.
#[derive(Debug, Parser)]
#[command(
    name = "issue-upsert",
    version,
    about = "File one tracker issue per flagged source file"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or comment on one issue per flagged file in the summary.
    Sync(SyncArgs),
}

/// Arguments for `issue-upsert sync`.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Path to the analysis summary file.
    #[arg(long, default_value = "./refactoring-results-summary.txt")]
    pub summary: PathBuf,

    /// Directory containing the per-file detail reports.
    #[arg(long, default_value = "./results")]
    pub results_dir: PathBuf,

    /// Seconds to wait between records; also the retry backoff base.
    #[arg(long, default_value = "2.0", value_parser = parse_seconds)]
    pub delay: Duration,

    /// Maximum attempts per API call.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_retries: u32,

    /// Seconds to wait after a record fails on a persistent rate limit.
    #[arg(long, default_value = "30", value_parser = parse_seconds)]
    pub rate_limit_cooldown: Duration,

    /// Search only; report what would be created or commented on.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Run options selected by these arguments.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            delay: self.delay,
            max_attempts: self.max_retries,
            rate_limit_cooldown: self.rate_limit_cooldown,
            dry_run: self.dry_run,
        }
    }
}

/// Parses a non-negative number of seconds.
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value.parse().map_err(|_| format!("{value:?} is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("{value:?} is not a valid duration"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn sync_defaults() {
        let cli = Cli::parse_from(["issue-upsert", "sync"]);
        let Command::Sync(args) = cli.command;
        let options = args.run_options();
        assert_eq!(args.summary.to_str(), Some("./refactoring-results-summary.txt"));
        assert_eq!(options.delay, Duration::from_secs(2));
        assert_eq!(options.max_attempts, 3);
        assert_eq!(options.rate_limit_cooldown, Duration::from_secs(30));
        assert!(!options.dry_run);
    }

    #[test]
    fn sync_accepts_fractional_delay_and_dry_run() {
        let cli = Cli::parse_from([
            "issue-upsert",
            "sync",
            "--delay",
            "0.5",
            "--max-retries",
            "5",
            "--dry-run",
        ]);
        let Command::Sync(args) = cli.command;
        assert_eq!(args.delay, Duration::from_millis(500));
        assert_eq!(args.max_retries, 5);
        assert!(args.dry_run);
    }

    #[test]
    fn rejects_negative_delay_and_zero_attempts() {
        assert!(Cli::try_parse_from(["issue-upsert", "sync", "--delay", "-1"]).is_err());
        assert!(Cli::try_parse_from(["issue-upsert", "sync", "--max-retries", "0"]).is_err());
    }
}
