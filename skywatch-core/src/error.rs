//! Error taxonomy for lookups and weather fetches.
//!
//! Every failure ends up as one banner line via [`Error::user_message`];
//! the `Display` impls keep the detail for logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single HTTP exchange with a provider endpoint.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to send request to {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status { endpoint: &'static str, status: StatusCode, body: String },

    #[error("failed to parse {endpoint} response: {message}")]
    Decode { endpoint: &'static str, message: String },
}

impl RequestError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            RequestError::Transport { endpoint, .. }
            | RequestError::Status { endpoint, .. }
            | RequestError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The geocoding service returned no match.
    #[error("no location found for '{query}'")]
    NotFound { query: String },

    /// The geocoding request itself failed.
    #[error("geocoding failed: {0}")]
    Network(#[source] RequestError),

    /// Either of the weather or air-quality requests failed.
    #[error("weather fetch failed: {0}")]
    Fetch(#[source] RequestError),
}

impl Error {
    /// Short message suitable for the inline error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "City not found",
            Error::Network(_) => "Failed to find city",
            Error::Fetch(_) => "Failed to fetch weather data",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
