use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub mod factory;
pub use factory::ClientFactory;

/// Default Cohere API URL
pub const COHERE_API_URL: &str = "https://api.cohere.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "COHERE_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "COHERE_BASE_URL";

/// Header identifying the calling application
pub const CLIENT_NAME_HEADER: &str = "X-Client-Name";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Set the {} environment variable before running this command", API_KEY_ENV)]
    MissingCredential,

    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Bearer token for the API. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(Self(token))
    }

    /// Read `COHERE_API_KEY` once. Missing and blank are the same failure.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingCredential)?;
        Self::new(token)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First characters followed by `***`, for logs.
    pub fn masked(&self) -> String {
        cohere_logging::mask_secret(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Trim whitespace and trailing slashes and make sure the URL is absolute
/// http(s). Endpoint paths are appended later.
pub fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

/// Everything needed to build a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credential: Credential,
    pub base_url: String,
    /// Sent as `X-Client-Name` when set
    pub client_name: Option<String>,
    pub timeout: Option<Duration>,
    pub verbose: bool,
    /// Write per-request log files here
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            base_url: COHERE_API_URL.to_string(),
            client_name: None,
            timeout: None,
            verbose: false,
            log_dir: None,
        }
    }

    /// Credential from `COHERE_API_KEY`, base URL from `COHERE_BASE_URL`
    /// when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new(Credential::from_env()?);
        match env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(&url),
            _ => Ok(config),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(url)?;
        Ok(self)
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

/// Optional TOML settings file. Every key is optional.
///
/// ```toml
/// base_url = "https://api.cohere.com"
/// client_name = "my-app"
/// timeout_secs = 30
/// log_dir = "/tmp/cohere-logs"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub client_name: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub verbose: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://api.cohere.com/").unwrap(), "https://api.cohere.com");
        assert_eq!(normalize_base_url("  http://localhost:8080//  ").unwrap(), "http://localhost:8080");
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(normalize_base_url("api.cohere.com").is_err());
    }

    #[test]
    fn test_credential_rejects_blank() {
        assert!(matches!(Credential::new("   "), Err(ConfigError::MissingCredential)));
        let credential = Credential::new(" abcdefghijklmnop ").unwrap();
        assert_eq!(credential.expose(), "abcdefghijklmnop");
        assert_eq!(credential.masked(), "abcdefghij***");
        assert_eq!(format!("{:?}", credential), "Credential(***)");
    }

    #[test]
    fn test_file_config_parsing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cohere.toml");
        std::fs::write(&path, "base_url = \"http://localhost:9000\"\ntimeout_secs = 15\n").unwrap();

        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(file.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(file.client_name, None);

        std::fs::write(&path, "bogus_key = 1\n").unwrap();
        assert!(matches!(FileConfig::load(&path), Err(ConfigError::Parse { .. })));

        assert!(matches!(
            FileConfig::load(&tmp.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
