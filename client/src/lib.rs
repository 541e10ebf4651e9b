pub mod client;

pub use client::{session_headers, Client, Response, DEFAULT_TIMEOUT};
pub use reqwest;
use thiserror::Error;

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
}

impl Error {
    /// Whether the request never produced a response (refused, reset, timed out).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Reqwest(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
