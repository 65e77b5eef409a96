//! # cohere-api
//!
//! Typed client for the Cohere v2 chat, embed and rerank endpoints.
//!
//! ## Features
//!
//! - **One call, one request**: each facade method makes exactly one transport call
//! - **Streaming Support**: `ChatOutcome::Streaming` yields decoded server-sent events
//! - **Pluggable Transport**: `HttpTransport` by default, any `Transport` in tests
//! - **Typed Errors**: validation, remote, decode and encode failures stay distinct
//!
//! ## Example
//!
//! ```rust,no_run
//! use cohere_api::{ClientConfig, ClientFactory, ChatOutcome};
//! use cohere_models::{ChatMessage, ChatRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = ClientFactory::create(&config)?;
//!
//!     let request = ChatRequest::builder("command-a-03-2025")
//!         .message(ChatMessage::user("Hello!"))
//!         .build()?;
//!
//!     if let ChatOutcome::Complete(response) = client.chat(&request).await? {
//!         println!("Response: {}", response.text().unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod sse;
pub mod stream;
pub mod transport;


pub use client::{ChatOutcome, CohereClient};

pub use config::{
    normalize_base_url,
    ClientConfig,
    ClientFactory,
    ConfigError,
    Credential,
    FileConfig,
    API_KEY_ENV,
    BASE_URL_ENV,
    COHERE_API_URL,
};

pub use error::{ApiError, RemoteError};
pub use stream::ChatStream;
pub use transport::{ByteStream, Endpoint, HttpTransport, Transport};
