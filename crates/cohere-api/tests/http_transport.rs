mod fixtures;

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

use cohere_api::{ApiError, ChatOutcome, ClientFactory};
use cohere_models::{ChatMessage, ChatRequest, EmbedInputType, EmbedRequest, EmbeddingType, RerankRequest};
use fixtures::{test_data, CohereMockServer};

fn chat_request(content: &str, stream: bool) -> ChatRequest {
    ChatRequest::builder("command-a-03-2025")
        .message(ChatMessage::user(content))
        .stream(stream)
        .build()
        .unwrap()
}

#[tokio::test]
async fn chat_sends_bearer_and_json_body() {
    let server = CohereMockServer::new().await;
    server.mock_chat_success("Hello!", "Hi there").await;

    let outcome = server.client().chat(&chat_request("Hello!", false)).await.unwrap();
    let ChatOutcome::Complete(response) = outcome else {
        panic!("expected a complete response");
    };

    assert_eq!(response.id(), "chat_test123");
    assert_eq!(response.text().as_deref(), Some("Hi there"));
    assert_eq!(response.total_tokens(), Some(30));
}

#[tokio::test]
async fn chat_streaming_over_http() {
    let server = CohereMockServer::new().await;
    server.mock_chat_streaming(&test_data::stream_frames(&["Hel", "lo", "!"])).await;

    let outcome = server.client().chat(&chat_request("Hello!", true)).await.unwrap();
    let ChatOutcome::Streaming(stream) = outcome else {
        panic!("expected a stream");
    };

    let events: Vec<_> = stream.collect().await;
    assert_eq!(events.len(), 7);
    assert!(events.iter().all(|e| e.is_ok()));

    let server = CohereMockServer::new().await;
    server.mock_chat_streaming(&test_data::stream_frames(&["a", "b"])).await;
    let response = server
        .client()
        .chat(&chat_request("Hello!", true))
        .await
        .unwrap()
        .into_response()
        .await
        .unwrap();
    assert_eq!(response.text().as_deref(), Some("ab"));
    assert_eq!(response.total_tokens(), Some(7));
}

#[tokio::test]
async fn embed_over_http() {
    let server = CohereMockServer::new().await;
    server
        .mock_embed_success(json!({
            "id": "emb_test",
            "response_type": "embeddings_by_type",
            "embeddings": {"float": [[0.1, 0.2]], "int8": [[12, -4]]},
            "texts": ["hello"],
            "meta": {"api_version": {"version": "2"}, "billed_units": {"input_tokens": 1}}
        }))
        .await;

    let request = EmbedRequest::builder("embed-v4.0", EmbedInputType::SearchDocument)
        .text("hello")
        .embedding_types([EmbeddingType::Float, EmbeddingType::Int8])
        .build()
        .unwrap();
    let response = server.client().embed(&request).await.unwrap();

    assert_eq!(response.available_types(), vec![EmbeddingType::Float, EmbeddingType::Int8]);
    assert_eq!(response.meta().and_then(|m| m.api_version()), Some("2"));
}

#[tokio::test]
async fn rerank_over_http() {
    let server = CohereMockServer::new().await;
    server
        .mock_rerank_success(json!({
            "id": "rr_test",
            "results": [{"index": 1, "relevance_score": 0.98}, {"index": 0, "relevance_score": 0.02}],
            "meta": {"billed_units": {"search_units": 1}}
        }))
        .await;

    let request = RerankRequest::builder("rerank-v3.5", "capital of France")
        .documents(["Madrid is in Spain", "Paris is in France"])
        .build()
        .unwrap();
    let response = server.client().rerank(&request).await.unwrap();
    let ranked = response.resolve(request.documents()).unwrap();

    assert_eq!(ranked[0].text, "Paris is in France");
    assert_eq!(response.search_units(), Some(1.0));
}

#[tokio::test]
async fn error_status_maps_to_remote_error() {
    let server = CohereMockServer::new().await;
    server.mock_error(401, test_data::error_scenarios::invalid_token()).await;

    let err = server.client().chat(&chat_request("Hello!", false)).await.unwrap_err();
    match err {
        ApiError::Remote(remote) => {
            assert_eq!(remote.status, Some(401));
            assert_eq!(remote.message, "invalid api token");
            assert!(remote.body.unwrap().contains("err-1"));
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn streaming_error_status_fails_before_stream() {
    let server = CohereMockServer::new().await;
    server.mock_error(429, test_data::error_scenarios::rate_limited()).await;

    let err = server.client().chat(&chat_request("Hello!", true)).await.unwrap_err();
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn timeout_is_a_transport_failure() {
    let server = CohereMockServer::new().await;
    server.mock_slow(Duration::from_secs(2)).await;

    let config = server.config().with_timeout(Duration::from_millis(200));
    let client = ClientFactory::create(&config).unwrap();

    let err = client.chat(&chat_request("Hello!", false)).await.unwrap_err();
    assert!(matches!(err, ApiError::Remote(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn client_name_header_is_sent() {
    let server = CohereMockServer::new().await;
    server.mock_requires_client_name("cohere-rs-tests").await;

    let config = server.config().with_client_name("cohere-rs-tests");
    let client = ClientFactory::create(&config).unwrap();

    let response = client
        .chat(&chat_request("Hello!", false))
        .await
        .unwrap()
        .into_response()
        .await
        .unwrap();
    assert_eq!(response.text().as_deref(), Some("named"));
}

#[tokio::test]
async fn log_files_are_written_per_call() {
    let server = CohereMockServer::new().await;
    server.mock_chat_success("Hello!", "logged").await;

    let logs = tempfile::tempdir().unwrap();
    let config = server.config().with_log_dir(logs.path());
    let client = ClientFactory::create(&config).unwrap();
    client.chat(&chat_request("Hello!", false)).await.unwrap();

    let mut names: Vec<String> = std::fs::read_dir(logs.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("req-") && names[0].ends_with("-chat.txt"));
    assert!(names[1].starts_with("resp-") && names[1].ends_with("-chat.txt"));

    let request_log = std::fs::read_to_string(logs.path().join(&names[0])).unwrap();
    assert!(!request_log.contains("test-api-key"));
}
