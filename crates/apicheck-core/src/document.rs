//! Parsed response documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::target::Target;

/// JSON body retrieved for a target, plus the HTTP status it came with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDocument {
    status: u16,
    body: Value,
}

impl ResponseDocument {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Decode a raw body. Malformed JSON becomes [`FetchError::Decode`].
    pub fn decode(target: &Target, status: u16, bytes: &[u8]) -> Result<Self, FetchError> {
        let body = serde_json::from_slice(bytes).map_err(|e| FetchError::Decode {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { status, body })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Top-level field lookup; `None` when absent or when the body is not an object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}
