//! Run configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default directory for per-run log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Component name written into every result line.
pub const COMPONENT_NAME: &str = "apicheck";

/// What the batch does when a target cannot be fetched at all.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Stop the run at the first transport failure.
    #[default]
    Abort,

    /// Record the failure as a failing report and move on.
    Continue,
}

/// Settings shared by the fetcher, the batch runner and the log destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Directory the per-run log file is created in.
    pub log_dir: PathBuf,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Behavior on transport failures.
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_dir: PathBuf::from(".").join(DEFAULT_LOG_DIR),
            user_agent: format!("apicheck/{}", crate::VERSION),
            fetch_failure_policy: FetchFailurePolicy::Abort,
        }
    }
}

impl ProbeConfig {
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn with_fetch_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_failure_policy = policy;
        self
    }

    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.log_dir.ends_with("logs"));
        assert_eq!(config.fetch_failure_policy, FetchFailurePolicy::Abort);
        assert!(config.user_agent.starts_with("apicheck/"));
    }

    #[test]
    fn test_builders_override() {
        let config = ProbeConfig::default()
            .with_timeout_secs(1)
            .with_log_dir("/tmp/apicheck-logs")
            .with_fetch_failure_policy(FetchFailurePolicy::Continue);
        assert_eq!(config.timeout_secs, 1);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/apicheck-logs"));
        assert_eq!(config.fetch_failure_policy, FetchFailurePolicy::Continue);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&FetchFailurePolicy::Continue).unwrap();
        assert_eq!(json, "\"continue\"");
    }
}
