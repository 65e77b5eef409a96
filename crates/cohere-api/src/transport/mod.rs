use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use std::fmt;
use std::pin::Pin;

use crate::config::Credential;
use crate::error::ApiError;

pub mod http;
pub use http::HttpTransport;

/// Raw response body chunks of a streamed call
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ApiError>> + Send>>;

/// The remote operations the facade can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Chat,
    Embed,
    Rerank,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Chat => "/v2/chat",
            Self::Embed => "/v2/embed",
            Self::Rerank => "/v2/rerank",
        }
    }

    /// Short name used in log file names and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Embed => "embed",
            Self::Rerank => "rerank",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Moves one JSON request to the service and hands back the answer.
///
/// Implementations map non-success statuses and connection failures to
/// [`ApiError::Remote`]; decoding the payload is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` and return the complete response text.
    async fn invoke(&self, endpoint: Endpoint, body: &Value, credential: &Credential) -> Result<String, ApiError>;

    /// Send `body` and return the response body as it arrives. Dropping the
    /// stream releases the connection.
    async fn invoke_streaming(
        &self,
        endpoint: Endpoint,
        body: &Value,
        credential: &Credential,
    ) -> Result<ByteStream, ApiError>;
}
