//! In-memory fakes for the fetcher and sink traits (testing only)
//!
//! Provides `StaticFetcher` and `MemorySink`, which satisfy the trait contracts
//! without network access or files.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::ResponseDocument;
use crate::error::{FetchError, SinkError};
use crate::fetch::Fetcher;
use crate::sink::{Record, ResultSink};
use crate::target::Target;

// ---------------------------------------------------------------------------
// StaticFetcher
// ---------------------------------------------------------------------------

/// Fetcher answering from canned responses keyed by target address.
///
/// Unknown targets fail with a transport error. Every call is recorded so
/// tests can assert which targets were actually fetched.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<ResponseDocument, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `target` with a 200 and the given JSON value.
    pub fn with_json(mut self, target: &str, body: Value) -> Self {
        self.responses
            .insert(target.to_string(), Ok(ResponseDocument::new(200, body)));
        self
    }

    /// Respond to `target` with a raw body, decoded the way a real response would be.
    pub fn with_body(mut self, target: &str, body: &str) -> Self {
        let decoded = ResponseDocument::decode(&Target::new(target), 200, body.as_bytes());
        self.responses.insert(target.to_string(), decoded);
        self
    }

    pub fn with_error(mut self, target: &str, error: FetchError) -> Self {
        self.responses.insert(target.to_string(), Err(error));
        self
    }

    /// Targets fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, target: &Target) -> Result<ResponseDocument, FetchError> {
        self.calls.lock().unwrap().push(target.to_string());
        self.responses
            .get(target.as_str())
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Transport {
                    target: target.to_string(),
                    reason: "no canned response".to_string(),
                })
            })
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }
}

impl ResultSink for MemorySink {
    fn record(&self, record: &Record) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(record.clone());
        Ok(())
    }
}
