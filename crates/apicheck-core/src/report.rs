//! Per-target and per-batch results.
//!
//! Everything here is append-only: reports are built once, pushed onto a
//! [`BatchSummary`], and never edited afterwards.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FetchError;
use crate::target::Target;

/// Result of evaluating one rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    /// Rule name (`name`, `can_relist`, ...) or `fetch`/`decode` for synthesized outcomes.
    pub rule: String,

    /// Whether the rule held.
    pub passed: bool,

    /// Expected vs actual, enough to diagnose without the document.
    pub message: String,
}

impl Outcome {
    pub fn pass(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            passed: false,
            message: message.into(),
        }
    }
}

/// Aggregated result for one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestReport {
    /// The address that was tested.
    pub target: Target,

    /// Outcomes in evaluation order; ends at the first failure.
    pub outcomes: Vec<Outcome>,

    /// True iff every rule was evaluated and every one passed.
    pub passed: bool,
}

impl TestReport {
    /// Build a report from rule outcomes. `rule_count` is the size of the full
    /// rule set, so a report cut short by fail-fast can never pass.
    pub fn evaluated(target: Target, outcomes: Vec<Outcome>, rule_count: usize) -> Self {
        let passed = outcomes.len() == rule_count && outcomes.iter().all(|o| o.passed);
        Self {
            target,
            outcomes,
            passed,
        }
    }

    /// Synthesize a failing report when no document could be validated.
    pub fn from_fetch_failure(target: Target, error: &FetchError) -> Self {
        Self {
            target,
            outcomes: vec![Outcome::fail(error.outcome_rule(), error.to_string())],
            passed: false,
        }
    }

    /// The outcome that stopped evaluation, if any.
    pub fn failure(&self) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| !o.passed)
    }
}

/// All reports of one run, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub reports: Vec<TestReport>,
}

impl BatchSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            reports: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, report: TestReport) {
        self.reports.push(report);
    }

    pub(crate) fn finish(&mut self, at: DateTime<Utc>) {
        self.finished_at = Some(at);
    }

    /// Number of targets processed.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Number of targets that passed every rule.
    pub fn passed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.passed).count()
    }

    /// Number of targets that failed.
    pub fn failed_count(&self) -> usize {
        self.total() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|r| r.passed)
    }

    /// Run duration in milliseconds, once finished.
    pub fn duration_ms(&self) -> Option<u64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds().max(0) as u64)
    }
}

/// Write the summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &BatchSummary) -> Result<()> {
    let content = serde_json::to_string_pretty(summary).context("serialize batch summary")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(passed: bool) -> TestReport {
        let outcome = if passed {
            Outcome::pass("name", "ok")
        } else {
            Outcome::fail("name", "bad")
        };
        TestReport::evaluated(Target::new("http://a"), vec![outcome], 1)
    }

    #[test]
    fn test_short_report_never_passes() {
        let report = TestReport::evaluated(
            Target::new("http://a"),
            vec![Outcome::pass("name", "ok")],
            3,
        );
        assert!(!report.passed);
        assert!(report.failure().is_none());
    }

    #[test]
    fn test_failure_returns_stopping_outcome() {
        let report = TestReport::evaluated(
            Target::new("http://a"),
            vec![
                Outcome::pass("name", "ok"),
                Outcome::fail("can_relist", "got false"),
            ],
            3,
        );
        assert!(!report.passed);
        assert_eq!(report.failure().map(|o| o.rule.as_str()), Some("can_relist"));
    }

    #[test]
    fn test_fetch_failure_report() {
        let err = FetchError::Timeout {
            target: "http://a".to_string(),
            timeout_secs: 5,
        };
        let report = TestReport::from_fetch_failure(Target::new("http://a"), &err);
        assert!(!report.passed);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].rule, "fetch");
        assert!(report.outcomes[0].message.contains("timed out"));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::new(Utc::now());
        summary.push(report(true));
        summary.push(report(false));
        summary.push(report(true));

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed_count(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert!(!summary.all_passed());
        assert!(summary.duration_ms().is_none());

        summary.finish(summary.started_at);
        assert_eq!(summary.duration_ms(), Some(0));
    }

    #[test]
    fn test_write_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let mut summary = BatchSummary::new(Utc::now());
        summary.push(report(false));

        write_summary_json(&path, &summary).unwrap();

        let loaded: BatchSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, summary);
    }
}
