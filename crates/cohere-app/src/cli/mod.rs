use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use cohere_api::{API_KEY_ENV, BASE_URL_ENV};
use cohere_models::{CitationMode, EmbedInputType, EmbeddingType, SafetyMode, Truncate};


pub const DEFAULT_CHAT_MODEL: &str = "command-r-08-2024";
pub const DEFAULT_EMBED_MODEL: &str = "embed-english-light-v3.0";
pub const DEFAULT_RERANK_MODEL: &str = "rerank-english-v3.0";

/// CLI arguments for cohere-cli
#[derive(Parser, Debug)]
#[command(name = "cohere-cli")]
#[command(about = "Cohere CLI - chat, embed and rerank against the Cohere v2 API")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,

    /// API key (read once at startup)
    #[arg(long, value_name = "KEY", env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the API (default: https://api.cohere.com)
    #[arg(long, value_name = "URL", env = BASE_URL_ENV, global = true)]
    pub base_url: Option<String>,

    /// TOML settings file (base_url, client_name, timeout_secs, log_dir, verbose)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Value of the X-Client-Name header
    #[arg(long, value_name = "NAME", global = true)]
    pub client_name: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Write request/response logs to this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Write request/response logs to ~/.cohere/logs
    #[arg(long, global = true)]
    pub log_files: bool,

    /// Enable verbose debug output (shows HTTP requests, responses, headers, etc.)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a chat request
    Chat(ChatArgs),
    /// Embed texts
    Embed(EmbedArgs),
    /// Rank documents by relevance to a query
    Rerank(RerankArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// User message
    #[arg(default_value = "Tell me about Cohere's AI capabilities and give me a code example.")]
    pub message: String,
    /// Model name
    #[arg(short = 'm', long, default_value = DEFAULT_CHAT_MODEL)]
    pub model: String,
    /// System message placed before the user message
    #[arg(short = 's', long)]
    pub system: Option<String>,
    /// Print the answer as it is generated
    #[arg(long)]
    pub stream: bool,
    /// Sampling temperature (0-1)
    #[arg(short = 't', long)]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[arg(long, allow_negative_numbers = true)]
    pub max_tokens: Option<i64>,
    /// Top-k sampling (0-500)
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    pub k: Option<i64>,
    /// Nucleus sampling (0.01-0.99)
    #[arg(short = 'p', long)]
    pub p: Option<f64>,
    /// Random seed for deterministic output
    #[arg(long)]
    pub seed: Option<u64>,
    /// Stop sequence (repeatable, at most 5)
    #[arg(long = "stop", value_name = "TEXT")]
    pub stop_sequences: Vec<String>,
    /// Frequency penalty (0-1)
    #[arg(long)]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty (0-1)
    #[arg(long)]
    pub presence_penalty: Option<f64>,
    /// CONTEXTUAL, STRICT or OFF
    #[arg(long, value_parser = SafetyMode::parse)]
    pub safety_mode: Option<SafetyMode>,
    /// FAST, ACCURATE or OFF
    #[arg(long, value_parser = CitationMode::parse)]
    pub citation_mode: Option<CitationMode>,
    /// Document text for grounded answers (repeatable)
    #[arg(long = "document", value_name = "TEXT")]
    pub documents: Vec<String>,
    /// Ask for a JSON object answer
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EmbedArgs {
    /// Texts to embed
    #[arg(default_values = ["Hello, world!", "Goodmem is awesome."])]
    pub texts: Vec<String>,
    /// Model name
    #[arg(short = 'm', long, default_value = DEFAULT_EMBED_MODEL)]
    pub model: String,
    /// search_document, search_query, classification, clustering or image
    #[arg(short = 'i', long, value_parser = EmbedInputType::parse, default_value = "clustering")]
    pub input_type: EmbedInputType,
    /// NONE, START or END
    #[arg(long, value_parser = Truncate::parse)]
    pub truncate: Option<Truncate>,
    /// float, int8, uint8, binary, ubinary or base64 (repeatable)
    #[arg(short = 'e', long = "embedding-type", value_parser = EmbeddingType::parse)]
    pub embedding_types: Vec<EmbeddingType>,
    /// 256, 512, 1024 or 1536
    #[arg(long)]
    pub output_dimension: Option<u32>,
    /// Truncate each input to this many tokens
    #[arg(long, allow_negative_numbers = true)]
    pub max_tokens: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct RerankArgs {
    /// Query to rank the documents against
    #[arg(short = 'q', long, default_value = "What is the capital of France?")]
    pub query: String,
    /// Documents to rank
    #[arg(default_values = [
        "Madrid is the capital of Spain",
        "France is a country in Europe",
        "Paris to France is like Rome to Italy",
        "Berlin is the capital of Germany",
        "Paris is the capital and largest city of France",
    ])]
    pub documents: Vec<String>,
    /// Model name
    #[arg(short = 'm', long, default_value = DEFAULT_RERANK_MODEL)]
    pub model: String,
    /// Number of results to return
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub top_n: Option<i64>,
    /// Truncate each document to this many tokens
    #[arg(long, allow_negative_numbers = true)]
    pub max_tokens_per_doc: Option<i64>,
}
