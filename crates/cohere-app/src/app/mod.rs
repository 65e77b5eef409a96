pub mod chat;
pub mod embed;
pub mod rerank;
pub mod setup;

use anyhow::Result;
use thiserror::Error;

use cohere_api::{ApiError, ClientFactory};

use crate::cli::Commands;

pub use setup::setup_from_cli;

/// A call that reached the API layer and failed there.
///
/// Carries the operation name so the binary can print
/// `Chat request failed: 401 invalid api token` followed by the raw body.
#[derive(Debug, Error)]
#[error("{operation} request failed: {source}")]
pub struct RequestFailed {
    pub operation: &'static str,
    #[source]
    pub source: ApiError,
}

impl RequestFailed {
    pub fn new(operation: &'static str, source: impl Into<ApiError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    pub fn body(&self) -> Option<&str> {
        self.source.body()
    }
}

/// Run one subcommand end to end: configure, build the request, call, print.
pub async fn run(cli: &crate::cli::Cli, command: &Commands) -> Result<()> {
    let config = setup_from_cli(cli)?;
    let client = ClientFactory::create(&config)?;

    match command {
        Commands::Chat(args) => chat::run_chat(&client, args).await?,
        Commands::Embed(args) => embed::run_embed(&client, args).await?,
        Commands::Rerank(args) => rerank::run_rerank(&client, args).await?,
    }
    Ok(())
}
