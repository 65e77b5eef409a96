//! # cohere-models
//!
//! Typed request and response values for the Cohere v2 endpoints:
//! - `POST /v2/chat` (complete and streamed)
//! - `POST /v2/embed`
//! - `POST /v2/rerank`
//!
//! ## Features
//!
//! - **Validating Builders**: requests only exist once every constraint holds
//! - **Closed Enumerations**: roles, safety modes and embedding options parse from strings
//! - **Read-only Responses**: accessors for text, tool calls, usage and billed units
//! - **Stream Events**: decode and fold chat stream events into a full response
//!
//! ## Example
//!
//! ```rust
//! use cohere_models::{ChatMessage, ChatRequest};
//!
//! let request = ChatRequest::builder("command-a-03-2025")
//!     .message(ChatMessage::user("Say hi"))
//!     .temperature(0.3)
//!     .build()
//!     .expect("valid request");
//!
//! assert_eq!(request.model(), "command-a-03-2025");
//! assert!(!request.is_streaming());
//! ```

pub mod error;
pub mod requests;
pub mod responses;
pub mod stream;
pub mod types;


// Re-export commonly used types
pub use error::{DecodeError, ValidationError};

pub use types::{
    CitationMode,
    EmbedInputType,
    EmbeddingType,
    FinishReason,
    FunctionCall,
    Role,
    SafetyMode,
    ToolCall,
    Truncate,
};

pub use requests::{
    ChatDocument,
    ChatMessage,
    ChatRequest,
    ChatRequestBuilder,
    CitationOptions,
    EmbedRequest,
    EmbedRequestBuilder,
    FunctionDef,
    RerankRequest,
    RerankRequestBuilder,
    ResponseFormat,
    Tool,
};

pub use responses::{
    ApiMeta,
    BilledUnits,
    ChatResponse,
    Citation,
    EmbedResponse,
    EmbeddingVectors,
    RankedDocument,
    RerankResponse,
    RerankResult,
    TokenCounts,
    Usage,
};

pub use stream::{ChatStreamAccumulator, ChatStreamEvent};
