//! Integration tests for the batch runner with in-memory fetcher and sink.

use apicheck_core::fakes::{MemorySink, StaticFetcher};
use apicheck_core::{
    parse_target_list, BatchError, BatchRunner, FetchError, FetchFailurePolicy, LineSink, Severity,
    Target,
};
use serde_json::json;
use std::sync::Arc;

fn passing_doc() -> serde_json::Value {
    json!({
        "Name": "Carbon credits",
        "CanRelist": true,
        "Promotions": [
            { "Name": "Gallery", "Description": "Good position in category and more" }
        ]
    })
}

fn refused(target: &str) -> FetchError {
    FetchError::Transport {
        target: target.to_string(),
        reason: "connection refused".to_string(),
    }
}

/// Scenario A: a conforming document passes all three rules.
#[tokio::test]
async fn test_conforming_document_passes() {
    let fetcher = StaticFetcher::new().with_json("http://api/ok", passing_doc());
    let sink = Arc::new(MemorySink::new());
    let runner = BatchRunner::new(Arc::new(fetcher), sink.clone());

    let summary = runner
        .run(&[Target::new("http://api/ok")])
        .await
        .expect("run failed");

    assert!(summary.all_passed());
    let report = &summary.reports[0];
    assert!(report.passed);
    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes.iter().all(|o| o.passed));

    assert_eq!(
        sink.messages(),
        vec![
            "Testing http://api/ok",
            "All tests passed for http://api/ok",
            "Batch complete: 1/1 targets passed",
        ]
    );
}

/// Scenario B: a wrong Name stops evaluation at the first rule.
#[tokio::test]
async fn test_wrong_name_fails_fast() {
    let fetcher = StaticFetcher::new().with_json(
        "http://api/widgets",
        json!({ "Name": "Widgets", "CanRelist": true, "Promotions": [] }),
    );
    let sink = Arc::new(MemorySink::new());
    let runner = BatchRunner::new(Arc::new(fetcher), sink.clone());

    let summary = runner
        .run(&[Target::new("http://api/widgets")])
        .await
        .expect("run failed");

    let report = &summary.reports[0];
    assert!(!report.passed);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].rule, "name");

    let records = sink.records();
    let verdict = &records[1];
    assert_eq!(verdict.severity, Severity::Warning);
    assert!(verdict.message.contains("Carbon credits"));
    assert!(verdict.message.contains("Widgets"));
}

/// Scenario C: only the first Gallery promotion is inspected.
#[tokio::test]
async fn test_first_gallery_entry_decides() {
    let fetcher = StaticFetcher::new().with_json(
        "http://api/two-galleries",
        json!({
            "Name": "Carbon credits",
            "CanRelist": true,
            "Promotions": [
                { "Name": "Gallery", "Description": "Standard placement" },
                { "Name": "Gallery", "Description": "Good position in category" }
            ]
        }),
    );
    let runner = BatchRunner::new(Arc::new(fetcher), Arc::new(MemorySink::new()));

    let summary = runner
        .run(&[Target::new("http://api/two-galleries")])
        .await
        .expect("run failed");

    let failure = summary.reports[0].failure().expect("must fail");
    assert_eq!(failure.rule, "gallery_description");
    assert!(failure.message.contains("Standard placement"));
}

/// Scenario D: a transport failure ends the run under the default policy.
#[tokio::test]
async fn test_transport_failure_aborts_by_default() {
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with_json("http://api/1", passing_doc())
            .with_error("http://api/2", refused("http://api/2"))
            .with_json("http://api/3", passing_doc()),
    );
    let sink = Arc::new(MemorySink::new());
    let runner = BatchRunner::new(fetcher.clone(), sink.clone());

    let targets = parse_target_list("http://api/1\nhttp://api/2\nhttp://api/3\n");
    let err = runner.run(&targets).await.unwrap_err();

    let BatchError::Aborted { error, summary } = err else {
        panic!("expected an aborted batch");
    };
    assert!(error.is_fatal());
    assert_eq!(summary.total(), 1, "only the target before the failure is reported");
    assert_eq!(fetcher.calls(), vec!["http://api/1", "http://api/2"]);

    let last = sink.records().pop().expect("records");
    assert_eq!(last.severity, Severity::Error);
    assert!(last.message.contains("http://api/2"));
}

/// With `Continue`, every non-blank target gets a report.
#[tokio::test]
async fn test_continue_policy_processes_every_target() {
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with_error(
                "http://api/slow",
                FetchError::Timeout {
                    target: "http://api/slow".to_string(),
                    timeout_secs: 5,
                },
            )
            .with_body("http://api/html", "<html></html>")
            .with_json("http://api/ok", passing_doc()),
    );
    let sink = Arc::new(MemorySink::new());
    let runner = BatchRunner::new(fetcher.clone(), sink.clone())
        .with_policy(FetchFailurePolicy::Continue);

    let targets = parse_target_list("\nhttp://api/slow\n\n  \nhttp://api/html\nhttp://api/ok\n");
    let summary = runner.run(&targets).await.expect("run failed");

    assert_eq!(summary.total(), targets.len());
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.passed_count(), 1);
    assert_eq!(summary.reports[0].outcomes[0].rule, "fetch");
    assert_eq!(summary.reports[1].outcomes[0].rule, "decode");
    assert!(summary.reports[2].passed);

    // One "Testing" line and one verdict line per target, plus the summary.
    assert_eq!(sink.records().len(), 3 * 2 + 1);
    assert_eq!(
        sink.messages().last().map(String::as_str),
        Some("Batch complete: 1/3 targets passed")
    );
}

#[tokio::test]
async fn test_rule_failures_never_stop_the_batch() {
    let fetcher = StaticFetcher::new()
        .with_json("http://api/a", json!({ "Name": "Other" }))
        .with_json("http://api/b", json!({ "Name": "Carbon credits", "CanRelist": false }))
        .with_json("http://api/c", passing_doc());
    let runner = BatchRunner::new(Arc::new(fetcher), Arc::new(MemorySink::new()));

    let targets = parse_target_list("http://api/a\nhttp://api/b\nhttp://api/c");
    let summary = runner.run(&targets).await.expect("run failed");

    let verdicts: Vec<bool> = summary.reports.iter().map(|r| r.passed).collect();
    assert_eq!(verdicts, vec![false, false, true]);
    assert_eq!(summary.failed_count(), 2);
}

/// The line sink writes the same lines to the console file and the run log.
#[tokio::test]
async fn test_line_sink_mirrors_destinations() {
    let dir = tempfile::tempdir().unwrap();
    let console = dir.path().join("console.out");
    let (log_path, log_file) =
        apicheck_core::create_log_file(&dir.path().join("logs"), chrono::Utc::now()).unwrap();

    let sink = Arc::new(
        LineSink::new("apicheck")
            .with_destination(std::fs::File::create(&console).unwrap())
            .with_destination(log_file),
    );
    let fetcher = StaticFetcher::new().with_json("http://api/ok", passing_doc());
    BatchRunner::new(Arc::new(fetcher), sink)
        .run(&[Target::new("http://api/ok")])
        .await
        .expect("run failed");

    let console_text = std::fs::read_to_string(&console).unwrap();
    let log_text = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(console_text, log_text);
    assert_eq!(log_text.lines().count(), 3);
    assert!(log_text
        .lines()
        .all(|line| line.split(" - ").nth(1) == Some("apicheck")));
}
