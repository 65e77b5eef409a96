// Logging module - HTTP request/response tracing
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// Re-export request logging functions
pub use request_logger::{
    log_request,
    log_request_to_file,
    log_response,
    log_response_to_file,
    log_stream_chunk,
    LogStamp,
};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Mask a bearer credential for display: first 10 characters, then `***`.
pub fn mask_secret(secret: &str) -> String {
    format!("{}***", secret.chars().take(10).collect::<String>())
}

/// Default location for request logs (~/.cohere/logs)
pub fn default_logs_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    Ok(PathBuf::from(home_dir).join(".cohere").join("logs"))
}

/// Create the logs directory if it doesn't exist yet
pub fn ensure_logs_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create logs directory {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}
