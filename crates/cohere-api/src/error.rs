use std::fmt;
use thiserror::Error;

use cohere_models::{DecodeError, ValidationError};

/// Everything a facade call can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a remote failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote(err) => err.status,
            _ => None,
        }
    }

    /// Raw payload that caused the failure, when there is one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Remote(err) => err.body.as_deref(),
            Self::Decode(err) => err.body.as_deref(),
            _ => None,
        }
    }
}

/// The service answered with a non-success status, or the transport failed
/// before an answer arrived (`status` is `None` then).
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
    pub body: Option<String>,
}

impl RemoteError {
    /// Build from an HTTP error response. The message comes from the body's
    /// `message` field when it is JSON, else from the reason phrase.
    pub fn from_response(status: u16, reason: Option<&str>, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .or_else(|| reason.map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self {
            status: Some(status),
            message,
            body: (!body.is_empty()).then_some(body),
        }
    }

    /// An error status whose body could not be read. The read failure is
    /// kept in the message since there is no body to show.
    pub fn unreadable_body(status: u16, reason: Option<&str>, read_error: impl fmt::Display) -> Self {
        let mut err = Self::from_response(status, reason, "");
        err.message = format!("{} (error body unreadable: {})", err.message, read_error);
        err
    }

    /// Connection refused, timeout, broken stream.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: None,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RemoteError {}
