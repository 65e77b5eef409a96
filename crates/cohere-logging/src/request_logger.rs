use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ensure_logs_dir, safe_truncate};

const MAX_CONSOLE_BODY: usize = 5000;

/// Timestamp shared by the request and response log files of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStamp(String);

impl LogStamp {
    pub fn now() -> Self {
        Self(Local::now().format("%Y%m%d-%H%M%S%3f").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// URL, host, port and scheme lines, as shown in both console and file logs.
fn url_details(url: &str) -> Vec<(&'static str, String)> {
    match reqwest::Url::parse(url) {
        Ok(parsed_url) => {
            let port = parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                if parsed_url.scheme() == "https" {
                    "443 (default)".to_string()
                } else {
                    "80 (default)".to_string()
                }
            });
            vec![
                ("URL", url.to_string()),
                ("Host", parsed_url.host_str().unwrap_or("unknown").to_string()),
                ("Port", port),
                ("Scheme", parsed_url.scheme().to_string()),
            ]
        }
        Err(_) => vec![("URL", url.to_string())],
    }
}

/// Pretty-print a body if it is JSON, otherwise return it unchanged.
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| body.to_string())
}

fn print_truncated(text: &str) {
    if text.chars().count() > MAX_CONSOLE_BODY {
        println!("{}", safe_truncate(text, MAX_CONSOLE_BODY));
        println!("\n{}", format!("... (truncated, total {} bytes)", text.len()).bright_black());
    } else {
        println!("{}", text);
    }
}

fn log_file_path(logs_dir: &Path, prefix: &str, stamp: &LogStamp, endpoint: &str) -> Result<(String, PathBuf)> {
    let dir = ensure_logs_dir(logs_dir)?;
    let filename = format!("{}-{}-{}.txt", prefix, stamp.as_str(), endpoint.replace('/', "-"));
    let path = dir.join(&filename);
    Ok((filename, path))
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, body: &Value, masked_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    for (label, value) in url_details(url) {
        println!("{}: {}", label.bright_yellow(), value);
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    println!("  Authorization: Bearer {}", masked_key);

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(body) {
        Ok(json) => print_truncated(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP request to file. Returns the stamp to pass to
/// [`log_response_to_file`] so both files pair up.
pub fn log_request_to_file(
    logs_dir: &Path,
    url: &str,
    body: &Value,
    endpoint: &str,
    masked_key: &str,
) -> Result<LogStamp> {
    let stamp = LogStamp::now();
    let (filename, file_path) = log_file_path(logs_dir, "req", &stamp, endpoint)?;

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", stamp.as_str()));
    log_content.push_str(&format!("Endpoint: {}\n\n", endpoint));

    for (label, value) in url_details(url) {
        log_content.push_str(&format!("{}: {}\n", label, value));
    }

    log_content.push_str("\nHeaders:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Authorization: Bearer {}\n\n", masked_key));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(body) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => log_content.push_str(&format!("Error serializing request: {}\n", e)),
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    println!("{}", format!("📝 Request logged to: {}", filename).bright_blue());

    Ok(stamp)
}

/// Log HTTP response to file, named to match its request file
pub fn log_response_to_file(
    logs_dir: &Path,
    status: &reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
    stamp: &LogStamp,
    endpoint: &str,
) -> Result<()> {
    let (filename, file_path) = log_file_path(logs_dir, "resp", stamp, endpoint)?;

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", stamp.as_str()));
    log_content.push_str(&format!("Endpoint: {}\n\n", endpoint));

    log_content.push_str(&format!(
        "Status: {} {}\n\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ));

    log_content.push_str("Headers:\n");
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            log_content.push_str(&format!("  {}: {}\n", name.as_str(), val_str));
        }
    }

    log_content.push_str("\nResponse Body:\n");
    log_content.push_str(&pretty_body(body));
    log_content.push('\n');

    log_content.push_str("\n---\n");
    log_content.push_str(&format!("Response Size: {} bytes\n", body.len()));
    log_content.push_str(&format!(
        "Content-Type: {}\n",
        headers
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
    ));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    println!("{}", format!("📄 Response logged to: {}", filename).bright_blue());

    Ok(())
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: &reqwest::StatusCode, headers: &reqwest::header::HeaderMap, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Headers:".bright_yellow());
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            println!("  {}: {}", name.as_str().bright_white(), val_str);
        }
    }

    println!("\n{}", "Response Body:".bright_yellow());
    print_truncated(&pretty_body(body));

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log streaming chunk for debugging (console output)
pub fn log_stream_chunk(chunk_num: usize, data: &str, verbose: bool) {
    if !verbose {
        return;
    }

    let shown = if data.chars().count() > 200 {
        format!("{}... ({} bytes)", safe_truncate(data, 200), data.len())
    } else {
        data.to_string()
    };
    println!("{}", format!("📦 Stream Chunk #{}: {}", chunk_num, shown).bright_black());
}
