//! Structured diagnostics for the fetch/validate/batch lifecycle.
//!
//! These go to the tracing subscriber (stderr), not to the result sink.
//! Verbosity is controlled through `RUST_LOG` or the binary's `--verbose` flag.

use tracing::{debug, info, warn};

/// RAII guard that enters a batch-scoped tracing span for the duration of a run.
pub struct BatchSpan {
    _span: tracing::span::EnteredSpan,
}

impl BatchSpan {
    pub fn enter(target_count: usize) -> Self {
        let span = tracing::info_span!("apicheck.batch", targets = target_count);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_fetch_started(target: &str, timeout_secs: u64) {
    debug!(event = "fetch.started", url = %target, timeout_secs = timeout_secs);
}

pub fn emit_fetch_finished(target: &str, status: u16, duration_ms: u64) {
    debug!(
        event = "fetch.finished",
        url = %target,
        status = status,
        duration_ms = duration_ms,
    );
}

/// Fetch failure (warning level).
pub fn emit_fetch_failed(target: &str, error: &dyn std::fmt::Display) {
    warn!(event = "fetch.failed", url = %target, error = %error);
}

pub fn emit_rule_evaluated(target: &str, rule: &str, passed: bool) {
    debug!(event = "rule.evaluated", url = %target, rule = %rule, passed = passed);
}

pub fn emit_batch_finished(total: usize, passed: usize, duration_ms: u64) {
    info!(
        event = "batch.finished",
        total = total,
        passed = passed,
        failed = total - passed,
        duration_ms = duration_ms,
    );
}

/// Batch stopped early on a fatal fetch error (warning level).
pub fn emit_batch_aborted(target: &str, processed: usize, error: &dyn std::fmt::Display) {
    warn!(
        event = "batch.aborted",
        url = %target,
        processed = processed,
        error = %error,
    );
}
