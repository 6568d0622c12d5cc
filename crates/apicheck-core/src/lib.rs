//! apicheck Core Library
//!
//! Contract testing for JSON-returning HTTP endpoints:
//! - Fetches each target with a bounded timeout
//! - Evaluates the fixed rule set fail-fast
//! - Reports per-target verdicts and a batch summary to explicit sinks

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod fakes;
pub mod fetch;
pub mod obs;
pub mod report;
pub mod rules;
pub mod sink;
pub mod target;
pub mod telemetry;
pub mod validator;

pub use batch::BatchRunner;
pub use config::{FetchFailurePolicy, ProbeConfig, COMPONENT_NAME, DEFAULT_TIMEOUT_SECS};
pub use document::ResponseDocument;
pub use error::{BatchError, FetchError, SetupError, SinkError, DECODE_RULE, FETCH_RULE};
pub use fetch::{Fetcher, HttpFetcher};
pub use report::{write_summary_json, BatchSummary, Outcome, TestReport};
pub use rules::{ContractRule, RuleSet};
pub use sink::{create_log_file, log_file_name, LineSink, Record, ResultSink, Severity};
pub use target::{parse_target_list, Target, TargetSource};
pub use telemetry::init_tracing;
pub use validator::Validator;

/// apicheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
