use async_stream::stream;
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use cohere_models::{ChatResponse, ChatStreamAccumulator, ChatStreamEvent, DecodeError};

use crate::error::ApiError;
use crate::sse::{SseDecoder, SseFrame};
use crate::transport::ByteStream;

/// Lazily decoded events of a streamed chat call.
///
/// Ends after `message-end`, after `[DONE]`, or when the connection closes.
/// Dropping it drops the response body and frees the connection.
pub struct ChatStream {
    inner: Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, ApiError>> + Send>>,
}

impl ChatStream {
    pub fn new(bytes: ByteStream) -> Self {
        let events = stream! {
            let mut bytes = bytes;
            let mut decoder = SseDecoder::new();
            let mut closed = false;

            'read: while !closed {
                let frames = match bytes.next().await {
                    Some(Ok(chunk)) => decoder.push(&chunk),
                    Some(Err(e)) => {
                        yield Err(e);
                        break 'read;
                    }
                    None => {
                        closed = true;
                        decoder.finish()
                    }
                };

                for frame in frames {
                    let data = match frame {
                        SseFrame::Done => break 'read,
                        SseFrame::Data(data) => data,
                    };
                    match serde_json::from_str::<ChatStreamEvent>(&data) {
                        Ok(event) => {
                            let terminal = event.is_terminal();
                            yield Ok(event);
                            if terminal {
                                break 'read;
                            }
                        }
                        Err(e) => {
                            yield Err(ApiError::from(DecodeError::new("chat stream", e.to_string()).with_body(data)));
                            break 'read;
                        }
                    }
                }
            }
        };

        Self { inner: Box::pin(events) }
    }

    /// Drain the stream into the response a non-streamed call would return.
    pub async fn collect_response(mut self) -> Result<ChatResponse, ApiError> {
        let mut accumulator = ChatStreamAccumulator::new();
        while let Some(event) = self.next().await {
            accumulator.apply(&event?);
        }
        Ok(accumulator.into_response())
    }
}

impl Stream for ChatStream {
    type Item = Result<ChatStreamEvent, ApiError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStream").finish_non_exhaustive()
    }
}
