//! Result lines and where they are written.
//!
//! Every event becomes one [`Record`], rendered as
//! `<UTC timestamp> - <component> - <severity> - <message>` and written
//! identically to every destination of a [`LineSink`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::error::{FetchError, SetupError, SinkError, FETCH_RULE};
use crate::report::{BatchSummary, TestReport};
use crate::target::Target;

const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
const LOG_NAME_FORMAT: &str = "%d-%m-%Y--%H.%M.%S.%6f";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        })
    }
}

/// One timestamped result event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self::at(Utc::now(), severity, message)
    }

    pub fn at(timestamp: DateTime<Utc>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            message: message.into(),
        }
    }

    pub fn testing(target: &Target) -> Self {
        Self::new(Severity::Info, format!("Testing {}", target))
    }

    /// Verdict line for a finished target.
    pub fn report(report: &TestReport) -> Self {
        match report.failure() {
            None if report.passed => Self::new(
                Severity::Info,
                format!("All tests passed for {}", report.target),
            ),
            None => Self::new(
                Severity::Warning,
                format!("FAILED {}: not every rule was evaluated", report.target),
            ),
            Some(outcome) => {
                let severity = if outcome.rule == FETCH_RULE {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                Self::new(
                    severity,
                    format!(
                        "FAILED {}: [{}] {}",
                        report.target, outcome.rule, outcome.message
                    ),
                )
            }
        }
    }

    /// Line for a transport failure that ends the run.
    pub fn fetch_failed(target: &Target, error: &FetchError) -> Self {
        Self::new(
            Severity::Error,
            format!("Fetch failed for {}: {}", target, error),
        )
    }

    pub fn summary(summary: &BatchSummary) -> Self {
        let severity = if summary.all_passed() {
            Severity::Info
        } else {
            Severity::Warning
        };
        Self::new(
            severity,
            format!(
                "Batch complete: {}/{} targets passed",
                summary.passed_count(),
                summary.total()
            ),
        )
    }

    pub fn render(&self, component: &str) -> String {
        format!(
            "{} - {} - {} - {}",
            self.timestamp.format(LINE_TIMESTAMP_FORMAT),
            component,
            self.severity,
            self.message
        )
    }
}

/// Destination for result records.
pub trait ResultSink: Send + Sync {
    fn record(&self, record: &Record) -> Result<(), SinkError>;
}

/// Writes each record as one line to every destination.
pub struct LineSink {
    component: String,
    destinations: Mutex<Vec<Box<dyn Write + Send>>>,
}

impl LineSink {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            destinations: Mutex::new(Vec::new()),
        }
    }

    /// Add a destination (builder pattern).
    pub fn with_destination(mut self, destination: impl Write + Send + 'static) -> Self {
        self.destinations
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(destination));
        self
    }

    /// stdout plus the durable run log.
    pub fn console_and_file(component: &str, log_file: File) -> Self {
        Self::new(component)
            .with_destination(std::io::stdout())
            .with_destination(log_file)
    }
}

impl ResultSink for LineSink {
    fn record(&self, record: &Record) -> Result<(), SinkError> {
        let line = record.render(&self.component);
        let mut destinations = self.destinations.lock().map_err(|_| SinkError::Poisoned)?;
        for destination in destinations.iter_mut() {
            writeln!(destination, "{}", line)?;
            destination.flush()?;
        }
        Ok(())
    }
}

/// File name of the run log for a run started at `started_at`.
pub fn log_file_name(started_at: DateTime<Utc>) -> String {
    format!("{}.log", started_at.format(LOG_NAME_FORMAT))
}

/// Create the log directory (if needed) and a fresh log file inside it.
///
/// The file is opened create-new: an existing file with the same name is a
/// [`SetupError::LogCollision`] and nothing is overwritten.
pub fn create_log_file(dir: &Path, started_at: DateTime<Utc>) -> Result<(PathBuf, File), SetupError> {
    if dir.is_dir() {
        debug!(log_dir = %dir.display(), "Found log directory");
    }
    std::fs::create_dir_all(dir).map_err(|source| SetupError::LogDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(log_file_name(started_at));
    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => Ok((path, file)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(SetupError::LogCollision { path }),
        Err(source) => Err(SetupError::LogFile { path, source }),
    }
}
