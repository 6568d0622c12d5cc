//! Batch orchestration across targets.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::config::FetchFailurePolicy;
use crate::error::BatchError;
use crate::fetch::Fetcher;
use crate::obs::{emit_batch_aborted, emit_batch_finished, BatchSpan};
use crate::report::{BatchSummary, TestReport};
use crate::sink::{Record, ResultSink};
use crate::target::Target;
use crate::validator::Validator;

/// Fetches and validates targets one at a time, reporting each to the sink.
pub struct BatchRunner {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ResultSink>,
    validator: Validator,
    policy: FetchFailurePolicy,
}

impl BatchRunner {
    /// Runner with the standard rule set and the default (abort) policy.
    pub fn new(fetcher: Arc<dyn Fetcher>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            fetcher,
            sink,
            validator: Validator::default(),
            policy: FetchFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process every target in order.
    ///
    /// Rule failures and undecodable bodies become failing reports and the
    /// batch moves on. A transport failure either ends the run with
    /// [`BatchError::Aborted`] or becomes a failing report, depending on the
    /// [`FetchFailurePolicy`].
    pub async fn run(&self, targets: &[Target]) -> Result<BatchSummary, BatchError> {
        let _span = BatchSpan::enter(targets.len());
        let mut summary = BatchSummary::new(Utc::now());

        for target in targets {
            self.sink.record(&Record::testing(target))?;

            let report = match self.fetcher.fetch(target).await {
                Ok(doc) => self.validator.validate(target, &doc),
                Err(error) if error.is_fatal() && self.policy == FetchFailurePolicy::Abort => {
                    self.sink.record(&Record::fetch_failed(target, &error))?;
                    emit_batch_aborted(target.as_str(), summary.total(), &error);
                    summary.finish(Utc::now());
                    return Err(BatchError::Aborted {
                        error,
                        summary: Box::new(summary),
                    });
                }
                Err(error) => TestReport::from_fetch_failure(target.clone(), &error),
            };

            info!(url = %target, passed = report.passed, "Target processed");
            self.sink.record(&Record::report(&report))?;
            summary.push(report);
        }

        summary.finish(Utc::now());
        self.sink.record(&Record::summary(&summary))?;
        emit_batch_finished(
            summary.total(),
            summary.passed_count(),
            summary.duration_ms().unwrap_or(0),
        );
        Ok(summary)
    }
}
