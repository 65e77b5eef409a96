#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use cohere_api::{ClientConfig, ClientFactory, CohereClient, Credential};

pub const TEST_API_KEY: &str = "test-api-key";

/// Mock server utilities for testing the Cohere HTTP transport
pub struct CohereMockServer {
    server: MockServer,
}

impl CohereMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(Credential::new(TEST_API_KEY).unwrap())
            .with_base_url(&self.uri())
            .unwrap()
    }

    pub fn client(&self) -> CohereClient {
        ClientFactory::create(&self.config()).unwrap()
    }

    /// Mock successful chat response, matching on the user message
    pub async fn mock_chat_success(&self, request_content: &str, response_content: &str) {
        Mock::given(method("POST"))
            .and(path("/v2/chat"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_partial_json(json!({
                "messages": [{"role": "user", "content": request_content}],
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_data::chat_response(response_content)))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a streamed chat response built from SSE frames
    pub async fn mock_chat_streaming(&self, frames: &[Value]) {
        let body: String = frames
            .iter()
            .map(|frame| {
                let event_type = frame["type"].as_str().unwrap_or("unknown");
                format!("event: {}\ndata: {}\n\n", event_type, frame)
            })
            .collect();

        Mock::given(method("POST"))
            .and(path("/v2/chat"))
            .and(header("accept", "text/event-stream"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_embed_success(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/v2/embed"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_rerank_success(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/v2/rerank"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock an API error on any endpoint
    pub async fn mock_error(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a response that arrives too late
    pub async fn mock_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(test_data::chat_response("late"))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock that only answers when the client name header is present
    pub async fn mock_requires_client_name(&self, name: &str) {
        Mock::given(method("POST"))
            .and(path("/v2/chat"))
            .and(header("x-client-name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_data::chat_response("named")))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

/// Test data generators for Cohere API testing
pub mod test_data {
    use serde_json::{json, Value};

    pub fn chat_response(text: &str) -> Value {
        json!({
            "id": "chat_test123",
            "finish_reason": "COMPLETE",
            "message": {
                "role": "assistant",
                "content": [{"type": "text", "text": text}]
            },
            "usage": {
                "billed_units": {"input_tokens": 10, "output_tokens": 20},
                "tokens": {"input_tokens": 10, "output_tokens": 20}
            }
        })
    }

    pub fn stream_frames(parts: &[&str]) -> Vec<Value> {
        let mut frames = vec![
            json!({"type": "message-start", "id": "stream_test123", "delta": {"message": {"role": "assistant"}}}),
            json!({"type": "content-start", "index": 0, "delta": {"message": {"content": {"type": "text", "text": ""}}}}),
        ];
        for part in parts {
            frames.push(json!({"type": "content-delta", "index": 0, "delta": {"message": {"content": {"text": part}}}}));
        }
        frames.push(json!({"type": "content-end", "index": 0}));
        frames.push(json!({
            "type": "message-end",
            "delta": {"finish_reason": "COMPLETE", "usage": {"tokens": {"input_tokens": 5, "output_tokens": parts.len()}}}
        }));
        frames
    }

    /// Error scenarios for testing
    pub mod error_scenarios {
        use serde_json::{json, Value};

        pub fn invalid_token() -> Value {
            json!({"id": "err-1", "message": "invalid api token"})
        }

        pub fn rate_limited() -> Value {
            json!({"id": "err-2", "message": "You are using a Trial key, which is limited to 10 API calls / minute."})
        }
    }
}
