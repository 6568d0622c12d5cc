//! Retrieving target documents over HTTP.

use async_trait::async_trait;
use std::time::Instant;

use crate::config::ProbeConfig;
use crate::document::ResponseDocument;
use crate::error::{FetchError, SetupError};
use crate::obs::{emit_fetch_failed, emit_fetch_finished, emit_fetch_started};
use crate::target::Target;

/// Source of response documents.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET the target and decode its body as JSON.
    async fn fetch(&self, target: &Target) -> Result<ResponseDocument, FetchError>;
}

/// [`Fetcher`] backed by a reqwest client with a bounded timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &ProbeConfig) -> Result<Self, SetupError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| SetupError::HttpClient(e.to_string()))?;

        Ok(HttpFetcher {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn classify(&self, target: &Target, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                target: target.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            FetchError::Transport {
                target: target.to_string(),
                reason: error_chain(&err),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> Result<ResponseDocument, FetchError> {
        let start = Instant::now();
        emit_fetch_started(target.as_str(), self.timeout_secs);

        let result: Result<ResponseDocument, FetchError> = async {
            let response = self
                .client
                .get(target.as_str())
                .send()
                .await
                .map_err(|e| self.classify(target, e))?;

            // Non-2xx bodies are still decoded and validated.
            let status = response.status().as_u16();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| self.classify(target, e))?;

            emit_fetch_finished(
                target.as_str(),
                status,
                start.elapsed().as_millis() as u64,
            );
            ResponseDocument::decode(target, status, &bytes)
        }
        .await;

        if let Err(ref e) = result {
            emit_fetch_failed(target.as_str(), e);
        }
        result
    }
}

/// reqwest's top-level message hides the cause ("error sending request"); append it.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_builds_from_default_config() {
        let fetcher = HttpFetcher::new(&ProbeConfig::default()).expect("client");
        assert_eq!(fetcher.timeout_secs, 5);
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(error_chain(&inner), "refused");
    }
}
