// Request values and their validating builders
pub mod chat;
pub mod embed;
pub mod rerank;

pub use chat::{
    ChatDocument, ChatMessage, ChatRequest, ChatRequestBuilder, CitationOptions, FunctionDef, ResponseFormat, Tool,
    MAX_STOP_SEQUENCES, MAX_TOP_K,
};
pub use embed::{EmbedRequest, EmbedRequestBuilder, MAX_EMBED_TEXTS, OUTPUT_DIMENSIONS};
pub use rerank::{RerankRequest, RerankRequestBuilder};
