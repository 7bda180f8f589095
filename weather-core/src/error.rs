use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single upstream lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to send request to {service}: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {service} JSON: {source}")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
