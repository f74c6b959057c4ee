// src/error.rs
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("no response within {0:?}")]
    Timeout(Duration),
}
