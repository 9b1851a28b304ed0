//! Command dispatch and handlers.

pub mod sync;

use std::env;

use crate::cli::Command;
use crate::config::TrackerConfig;
use crate::context::ServiceContext;

/// Environment variable naming a cassette file to record the run into.
pub const RECORD_ENV: &str = "ISSUE_UPSERT_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `ISSUE_UPSERT_RECORD` is set to a file path, clock and transport
/// interactions are recorded to a cassette at that path.
///
/// # Errors
///
/// Returns an error string if configuration is missing or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = TrackerConfig::from_env().map_err(|e| e.to_string())?;
    let ctx = match env::var(RECORD_ENV) {
        Ok(path) if !path.is_empty() => ServiceContext::recording(&config, path)?,
        _ => ServiceContext::live(&config)?,
    };

    let result = dispatch_with_context(command, &ctx, &config);

    // Write the cassette even when the command failed.
    if let Some(path) = ctx.finish_recording()? {
        eprintln!("Recording saved to: {}", path.display());
    }

    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &TrackerConfig,
) -> Result<(), String> {
    match command {
        Command::Sync(args) => sync::run_with_context(
            ctx,
            config,
            &args.run_options(),
            &args.summary,
            &args.results_dir,
        ),
    }
}
