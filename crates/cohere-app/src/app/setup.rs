use anyhow::{Context, Result};

use cohere_api::{ClientConfig, ConfigError, Credential, FileConfig, COHERE_API_URL};
use cohere_logging::default_logs_dir;

use crate::cli::Cli;

/// Build the client configuration once, before any request is made.
///
/// Flags win over environment variables (clap folds those in), which win over
/// the settings file, which wins over built-in defaults. A missing key fails
/// here so no network traffic happens without credentials.
pub fn setup_from_cli(cli: &Cli) -> Result<ClientConfig> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let api_key = cli.api_key.as_deref().ok_or(ConfigError::MissingCredential)?;
    let credential = Credential::new(api_key)?;

    let base_url = non_blank(cli.base_url.as_deref())
        .or(non_blank(file.base_url.as_deref()))
        .unwrap_or(COHERE_API_URL);

    let mut config = ClientConfig::new(credential)
        .with_base_url(base_url)?
        .with_verbose(cli.verbose || file.verbose.unwrap_or(false));

    if let Some(name) = cli.client_name.clone().or(file.client_name.clone()) {
        config = config.with_client_name(name);
    }

    if let Some(timeout) = cli
        .timeout_secs
        .map(std::time::Duration::from_secs)
        .or(file.timeout())
    {
        config = config.with_timeout(timeout);
    }

    let log_dir = match (&cli.log_dir, cli.log_files) {
        (Some(dir), _) => Some(dir.clone()),
        (None, true) => Some(default_logs_dir().context("Failed to resolve the default log directory")?),
        (None, false) => file.log_dir.clone(),
    };
    if let Some(dir) = log_dir {
        config = config.with_log_dir(dir);
    }

    Ok(config)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
