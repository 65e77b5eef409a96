use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

use cohere_models::{ChatRequest, ChatResponse, DecodeError, EmbedRequest, EmbedResponse, RerankRequest, RerankResponse};

use crate::config::Credential;
use crate::error::ApiError;
use crate::stream::ChatStream;
use crate::transport::{Endpoint, Transport};

/// Result of a chat call: the whole answer, or the event stream when the
/// request asked for streaming.
#[derive(Debug)]
pub enum ChatOutcome {
    Complete(ChatResponse),
    Streaming(ChatStream),
}

impl ChatOutcome {
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming(_))
    }

    /// The complete response, draining the stream if there is one.
    pub async fn into_response(self) -> Result<ChatResponse, ApiError> {
        match self {
            Self::Complete(response) => Ok(response),
            Self::Streaming(stream) => stream.collect_response().await,
        }
    }
}

/// Typed facade over the chat, embed and rerank endpoints.
///
/// Each call serializes the already validated request, makes exactly one
/// transport call and decodes the answer. Nothing is retried and no state is
/// kept between calls, so a client can be cloned and shared freely.
#[derive(Clone)]
pub struct CohereClient {
    transport: Arc<dyn Transport>,
    credential: Credential,
}

impl CohereClient {
    pub fn new(transport: Arc<dyn Transport>, credential: Credential) -> Self {
        Self { transport, credential }
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatOutcome, ApiError> {
        let body = serde_json::to_value(request)?;

        if request.is_streaming() {
            let bytes = self
                .transport
                .invoke_streaming(Endpoint::Chat, &body, &self.credential)
                .await?;
            return Ok(ChatOutcome::Streaming(ChatStream::new(bytes)));
        }

        let response_text = self.transport.invoke(Endpoint::Chat, &body, &self.credential).await?;
        Ok(ChatOutcome::Complete(decode(Endpoint::Chat, &response_text)?))
    }

    pub async fn embed(&self, request: &EmbedRequest) -> Result<EmbedResponse, ApiError> {
        let body = serde_json::to_value(request)?;
        let response_text = self.transport.invoke(Endpoint::Embed, &body, &self.credential).await?;
        decode(Endpoint::Embed, &response_text)
    }

    pub async fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse, ApiError> {
        let body = serde_json::to_value(request)?;
        let response_text = self.transport.invoke(Endpoint::Rerank, &body, &self.credential).await?;
        decode(Endpoint::Rerank, &response_text)
    }
}

impl fmt::Debug for CohereClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CohereClient")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, response_text: &str) -> Result<T, ApiError> {
    serde_json::from_str(response_text)
        .map_err(|e| DecodeError::new(endpoint.name(), e.to_string()).with_body(response_text).into())
}
