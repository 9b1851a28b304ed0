//! End-to-end sync runs replayed from cassettes.
//!
//! Each test writes a summary and detail reports to a scratch directory,
//! replays the tracker from a cassette, and checks the run's effect on the
//! tracker and its exit status.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Value};

use issue_upsert::adapters::live::LiveFileSystem;
use issue_upsert::adapters::replaying::{ReplayingClock, ReplayingSleeper, ReplayingTransport};
use issue_upsert::cassette::format::Cassette;
use issue_upsert::cassette::recorder::CassetteRecorder;
use issue_upsert::commands::sync::run_with_context;
use issue_upsert::config::{RunOptions, TrackerConfig};
use issue_upsert::context::ServiceContext;
use issue_upsert::report::{load_items, report_path};
use issue_upsert::tracker::IssueUpserter;

struct Workspace {
    dir: PathBuf,
    summary: PathBuf,
    results: PathBuf,
}

impl Workspace {
    fn new(name: &str, records: &[(&str, &str)]) -> Self {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let results = dir.join("results");
        std::fs::create_dir_all(&results).unwrap();

        let mut summary_text = String::from("Refactoring scan results\n\n");
        for (subject, description) in records {
            summary_text.push_str(&format!("⚠️  {subject}: {description}\n"));
            std::fs::write(
                report_path(&results, subject),
                format!("Detailed findings for {subject}\n```cpp\nint x = 42;\n```\n"),
            )
            .unwrap();
        }
        let summary = dir.join("refactoring-results-summary.txt");
        std::fs::write(&summary, summary_text).unwrap();
        Self {
            dir,
            summary,
            results,
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

struct Replay {
    ctx: ServiceContext,
    transport: ReplayingTransport,
    sleeper: ReplayingSleeper,
}

fn replay(cassette: &Cassette) -> Replay {
    let transport = ReplayingTransport::from_cassette(cassette);
    let sleeper = ReplayingSleeper::new();
    let ctx = ServiceContext::new(
        Box::new(ReplayingClock::from_cassette(cassette)),
        Box::new(LiveFileSystem),
        Box::new(transport.clone()),
        Box::new(sleeper.clone()),
    );
    Replay {
        ctx,
        transport,
        sleeper,
    }
}

fn send(cassette: Cassette, method: &str, outcome: Value) -> Cassette {
    cassette.with("transport", "send", json!({ "method": method }), outcome)
}

fn now(cassette: Cassette) -> Cassette {
    cassette.with("clock", "now", json!(null), json!("2025-03-15T14:30:00Z"))
}

fn config() -> TrackerConfig {
    TrackerConfig::for_repository("acme", "widgets")
}

fn run(replay: &Replay, options: &RunOptions, ws: &Workspace) -> Result<(), String> {
    run_with_context(&replay.ctx, &config(), options, &ws.summary, &ws.results)
}

#[test]
fn second_run_for_same_subject_comments_instead_of_duplicating() {
    let ws = Workspace::new(
        "issue_upsert_e2e_dedup",
        &[("Audio Engine Crash", "High Complexity"), ("Audio Engine Crash", "High Complexity")],
    );
    let mut cassette = Cassette::new("dedup", "acme/widgets");
    cassette = now(now(cassette));
    cassette = send(cassette, "GET", json!({"Success": {"total_count": 0, "items": []}}));
    cassette = send(cassette, "POST", json!({"Success": {"number": 101}}));
    cassette = send(
        cassette,
        "GET",
        json!({"Success": {"items": [
            {"number": 7, "title": "[Refactoring] Audio Engine Crash (old)"},
            {"number": 101, "title": "[Refactoring] Audio Engine Crash"}
        ]}}),
    );
    cassette = send(cassette, "POST", json!({"Success": {"id": 555}}));
    let replay = replay(&cassette);

    let options = RunOptions {
        delay: Duration::from_secs(2),
        ..RunOptions::default()
    };
    run(&replay, &options, &ws).expect("run should succeed");

    let requests = replay.transport.requests();
    let posts: Vec<_> = requests.iter().filter(|r| r.is_mutating()).collect();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].path, "/repos/acme/widgets/issues");
    assert_eq!(posts[1].path, "/repos/acme/widgets/issues/101/comments");

    let query = &requests[0].query[0];
    assert_eq!(query.0, "q");
    assert!(query.1.contains("repo:acme/widgets"));
    assert!(query.1.contains("is:issue is:open"));
    assert!(query.1.contains("\"Audio Engine Crash\""));

    let comment = posts[1].body.as_ref().unwrap()["body"].as_str().unwrap().to_string();
    assert!(comment.contains("2025-03-15"));
    assert!(comment.contains("int x = 42;"));
    assert_eq!(replay.sleeper.waits(), vec![Duration::from_secs(2)]);
    assert_eq!(replay.transport.remaining(), 0);
}

#[test]
fn persistent_rate_limit_fails_record_and_run() {
    let ws = Workspace::new(
        "issue_upsert_e2e_rate_limit",
        &[("src/dsp/filter.cpp", "Magic Numbers")],
    );
    let mut cassette = Cassette::new("rate-limit", "acme/widgets");
    for _ in 0..3 {
        cassette = send(
            cassette,
            "GET",
            json!({"RateLimited": {
                "retry_after_secs": null,
                "message": "API rate limit exceeded"
            }}),
        );
    }
    let replay = replay(&cassette);

    let options = RunOptions {
        delay: Duration::from_secs(1),
        max_attempts: 3,
        ..RunOptions::default()
    };
    let err = run(&replay, &options, &ws).unwrap_err();

    assert_eq!(err, "1 of 1 records failed");
    assert_eq!(replay.transport.remaining(), 0);
    // Backoff before attempts two and three; no cooldown after the last record.
    assert_eq!(replay.sleeper.waits(), vec![Duration::from_secs(2), Duration::from_secs(4)]);
}

#[test]
fn retry_after_header_extends_the_wait() {
    let ws = Workspace::new("issue_upsert_e2e_retry_after", &[("a.cpp", "Large File")]);
    let mut cassette = now(Cassette::new("retry-after", "acme/widgets"));
    cassette = send(
        cassette,
        "GET",
        json!({"RateLimited": {"retry_after_secs": 60, "message": "secondary rate limit"}}),
    );
    cassette = send(cassette, "GET", json!({"Success": {"items": []}}));
    cassette = send(cassette, "POST", json!({"Success": {"number": 9}}));
    let replay = replay(&cassette);

    run(&replay, &RunOptions::default(), &ws).expect("run should succeed");

    assert_eq!(replay.sleeper.waits(), vec![Duration::from_secs(60)]);
    assert_eq!(replay.transport.remaining(), 0);
}

#[tokio::test]
async fn dry_run_lists_planned_actions_without_mutating() {
    let ws = Workspace::new(
        "issue_upsert_e2e_dry_run",
        &[("a.cpp", "Large File"), ("b.cpp", "God Object"), ("c.cpp", "Magic Numbers")],
    );
    let mut cassette = Cassette::new("dry-run", "acme/widgets");
    cassette = send(cassette, "GET", json!({"Success": {"items": []}}));
    cassette = send(
        cassette,
        "GET",
        json!({"Success": {"items": [{"number": 12, "title": "[Refactoring] b.cpp"}]}}),
    );
    cassette = send(cassette, "GET", json!({"Success": {"items": []}}));
    let replay = replay(&cassette);

    let options = RunOptions {
        dry_run: true,
        delay: Duration::ZERO,
        ..RunOptions::default()
    };
    let config = config();
    let items = load_items(replay.ctx.fs.as_ref(), &ws.summary, &ws.results).unwrap();
    let stats = IssueUpserter::new(&replay.ctx, &config, &options).run(&items).await;

    assert_eq!((stats.created, stats.updated, stats.failed), (0, 0, 0));
    assert_eq!((stats.skipped, stats.total), (3, 3));
    let text = stats.format_summary();
    assert!(text.contains("Planned actions (dry run, 3):"));
    assert!(text.contains("  - create issue: [Refactoring] a.cpp\n"));
    assert!(text.contains("  - comment on #12: b.cpp\n"));
    assert!(text.contains("  - create issue: [Refactoring] c.cpp\n"));

    let requests = replay.transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| !r.is_mutating()));
    assert_eq!(replay.transport.remaining(), 0);
    assert!(replay.sleeper.waits().is_empty());
}

#[test]
fn dry_run_command_succeeds_without_posts() {
    let ws = Workspace::new("issue_upsert_e2e_dry_run_cmd", &[("a.cpp", "Large File")]);
    let cassette = send(
        Cassette::new("dry-run-cmd", "acme/widgets"),
        "GET",
        json!({"Success": {"items": []}}),
    );
    let replay = replay(&cassette);

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    run(&replay, &options, &ws).expect("dry run should succeed");

    assert!(replay.transport.requests().iter().all(|r| !r.is_mutating()));
    assert_eq!(replay.transport.remaining(), 0);
}

#[test]
fn unreadable_detail_report_fails_the_run() {
    let ws = Workspace::new("issue_upsert_e2e_unreadable_report", &[("a.cpp", "Large File")]);
    std::fs::write(report_path(&ws.results, "a.cpp"), b"line 1: \xff\xfe caf\xe9 42\n").unwrap();
    let replay = replay(&Cassette::new("empty", "acme/widgets"));

    let err = run(&replay, &RunOptions::default(), &ws).unwrap_err();

    assert_eq!(err, "1 of 1 records failed");
    assert!(replay.transport.requests().is_empty());
}

#[test]
fn missing_detail_report_is_skipped() {
    let ws = Workspace::new("issue_upsert_e2e_missing_report", &[("a.cpp", "Large File")]);
    std::fs::remove_file(report_path(&ws.results, "a.cpp")).unwrap();
    let replay = replay(&Cassette::new("empty", "acme/widgets"));

    run(&replay, &RunOptions::default(), &ws).expect("skipped records are not failures");

    assert!(replay.transport.requests().is_empty());
}

fn write_cassette(path: &Path, cassette: &Cassette) {
    let written = CassetteRecorder::resume(path, cassette.clone())
        .finish()
        .expect("recording should succeed");
    assert_eq!(written, path);
}

#[test]
fn recorded_cassette_replays_deterministically() {
    let ws = Workspace::new(
        "issue_upsert_e2e_roundtrip",
        &[("src/ui/mixer.cpp", "Long Function")],
    );
    let cassette_path = ws.dir.join("roundtrip.cassette.yaml");

    let mut cassette = now(Cassette::new("roundtrip", "acme/widgets"));
    cassette = send(cassette, "GET", json!({"Success": {"items": []}}));
    cassette = send(cassette, "POST", json!({"Success": {"number": 42}}));
    write_cassette(&cassette_path, &cassette);

    for _ in 0..2 {
        let ctx = ServiceContext::replaying(&cassette_path).unwrap();
        run_with_context(&ctx, &config(), &RunOptions::default(), &ws.summary, &ws.results)
            .expect("replayed run should succeed");
        assert_eq!(ctx.finish_recording().unwrap(), None);
    }
}
