//! Command-line front end for the Cohere v2 chat, embed and rerank endpoints.
//!
//! The binary (`cohere-cli`) parses flags with [`cli::Cli`], resolves a
//! [`cohere_api::ClientConfig`] through [`app::setup_from_cli`], and hands the
//! selected subcommand to [`app::run`].

pub mod app;
pub mod cli;

pub use app::{run, setup_from_cli, RequestFailed};
pub use cli::{ChatArgs, Cli, Commands, EmbedArgs, RerankArgs};
