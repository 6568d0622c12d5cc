//! Error taxonomy for apicheck.
//!
//! Only transport-level [`FetchError`]s and [`SetupError`]s can end a run.
//! Decode failures and rule failures are contained to a single target's report.

use std::path::PathBuf;

use thiserror::Error;

use crate::report::BatchSummary;

/// Outcome rule name for a target that could not be fetched.
pub const FETCH_RULE: &str = "fetch";

/// Outcome rule name for a body that is not valid JSON.
pub const DECODE_RULE: &str = "decode";

/// Failures produced while fetching a target document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No response arrived within the configured timeout.
    #[error("request to {target} timed out after {timeout_secs}s")]
    Timeout { target: String, timeout_secs: u64 },

    /// The request could not be completed (connection refused, DNS, bad URL, ...).
    #[error("request to {target} failed: {reason}")]
    Transport { target: String, reason: String },

    /// A response arrived but its body is not valid JSON.
    #[error("response from {target} is not valid JSON: {reason}")]
    Decode { target: String, reason: String },
}

impl FetchError {
    /// Whether this error is transport-level (and therefore able to end the run).
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Transport { .. })
    }

    /// The target address the failed fetch was aimed at.
    pub fn target(&self) -> &str {
        match self {
            FetchError::Timeout { target, .. }
            | FetchError::Transport { target, .. }
            | FetchError::Decode { target, .. } => target,
        }
    }

    /// Name recorded as the stopping outcome when this error becomes a report.
    pub fn outcome_rule(&self) -> &'static str {
        match self {
            FetchError::Decode { .. } => DECODE_RULE,
            _ => FETCH_RULE,
        }
    }
}

/// Failures that prevent a run from starting.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot create log directory {}: {source}", .path.display())]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("log file {} already exists; remove existing copies", .path.display())]
    LogCollision { path: PathBuf },

    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read target list {}: {source}", .path.display())]
    TargetList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failures while writing result lines.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write result line: {0}")]
    Io(#[from] std::io::Error),

    #[error("result sink lock poisoned")]
    Poisoned,
}

/// Failures that end a batch early.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A transport-level fetch failure stopped the run. `summary` holds the
    /// reports completed before the failing target.
    #[error("run aborted: {error}")]
    Aborted {
        error: FetchError,
        summary: Box<BatchSummary>,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
