//! Journey API client error types.

use std::fmt;

use crate::retry::Retryable;

/// Errors from the journey API client.
#[derive(Debug)]
pub enum HafasError {
    /// HTTP request failed (network error, timeout, request construction)
    Http(reqwest::Error),

    /// API returned a non-success status code
    Api { status: u16, message: String },

    /// Body was not valid JSON, or lacked the `journeys` array
    Malformed {
        message: String,
        body: Option<String>,
    },

    /// Fixture data missing or unreadable
    Fixture(String),
}

impl HafasError {
    /// Returns true if repeating the request may succeed.
    ///
    /// Everything the network or the server can cause is transient. A
    /// request that could not even be built, or a missing fixture, will
    /// fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            HafasError::Http(e) => !e.is_builder(),
            HafasError::Api { .. } | HafasError::Malformed { .. } => true,
            HafasError::Fixture(_) => false,
        }
    }
}

impl Retryable for HafasError {
    fn is_transient(&self) -> bool {
        HafasError::is_transient(self)
    }
}

impl fmt::Display for HafasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HafasError::Http(e) => write!(f, "HTTP error: {e}"),
            HafasError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            HafasError::Malformed { message, body } => {
                write!(f, "malformed response: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            HafasError::Fixture(msg) => write!(f, "fixture error: {msg}"),
        }
    }
}

impl std::error::Error for HafasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HafasError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HafasError {
    fn from(err: reqwest::Error) -> Self {
        HafasError::Http(err)
    }
}
