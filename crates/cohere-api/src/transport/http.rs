use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use cohere_logging::{log_request, log_request_to_file, log_response, log_response_to_file, log_stream_chunk, LogStamp};

use super::{ByteStream, Endpoint, Transport};
use crate::config::{ClientConfig, Credential, CLIENT_NAME_HEADER};
use crate::error::{ApiError, RemoteError};

/// Transport over HTTPS using reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    client_name: Option<String>,
    timeout: Option<Duration>,
    verbose: bool,
    log_dir: Option<PathBuf>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            // Whole-request timeouts would cut long streams short; those
            // only get the connect timeout.
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_name: config.client_name.clone(),
            timeout: config.timeout,
            verbose: config.verbose,
            log_dir: config.log_dir.clone(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Send the request. Non-success answers are read in full and returned
    /// as [`RemoteError`].
    async fn send(
        &self,
        endpoint: Endpoint,
        body: &Value,
        credential: &Credential,
        streaming: bool,
    ) -> Result<(reqwest::Response, Option<LogStamp>), ApiError> {
        let url = self.url(endpoint);
        let masked = credential.masked();

        log_request(&url, body, &masked, self.verbose);
        let stamp = self
            .log_dir
            .as_ref()
            .and_then(|dir| log_request_to_file(dir, &url, body, endpoint.name(), &masked).ok());

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(credential.expose())
            .header("Content-Type", "application/json")
            .json(body);

        if streaming {
            request = request.header("Accept", "text/event-stream");
        } else {
            request = request.header("Accept", "application/json");
            if let Some(timeout) = self.timeout {
                request = request.timeout(timeout);
            }
        }
        if let Some(name) = &self.client_name {
            request = request.header(CLIENT_NAME_HEADER, name);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::transport(format!("{} request failed: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let error = match response.text().await {
                Ok(error_text) => {
                    self.log_answer(&status, &headers, &error_text, stamp.as_ref(), endpoint);
                    RemoteError::from_response(status.as_u16(), status.canonical_reason(), error_text)
                }
                Err(read_error) => {
                    let error = RemoteError::unreadable_body(status.as_u16(), status.canonical_reason(), read_error);
                    self.log_answer(&status, &headers, &error.message, stamp.as_ref(), endpoint);
                    error
                }
            };
            return Err(error.into());
        }

        Ok((response, stamp))
    }

    fn log_answer(
        &self,
        status: &reqwest::StatusCode,
        headers: &reqwest::header::HeaderMap,
        body: &str,
        stamp: Option<&LogStamp>,
        endpoint: Endpoint,
    ) {
        log_response(status, headers, body, self.verbose);
        if let (Some(dir), Some(stamp)) = (&self.log_dir, stamp) {
            let _ = log_response_to_file(dir, status, headers, body, stamp, endpoint.name());
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, endpoint: Endpoint, body: &Value, credential: &Credential) -> Result<String, ApiError> {
        let (response, stamp) = self.send(endpoint, body, credential, false).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response
            .text()
            .await
            .map_err(|e| RemoteError::transport(format!("failed to read {} response: {}", endpoint, e)))?;

        self.log_answer(&status, &headers, &response_text, stamp.as_ref(), endpoint);
        Ok(response_text)
    }

    async fn invoke_streaming(
        &self,
        endpoint: Endpoint,
        body: &Value,
        credential: &Credential,
    ) -> Result<ByteStream, ApiError> {
        let (response, stamp) = self.send(endpoint, body, credential, true).await?;

        let status = response.status();
        let headers = response.headers().clone();
        self.log_answer(&status, &headers, "(streaming body)", stamp.as_ref(), endpoint);

        let verbose = self.verbose;
        let byte_stream = response.bytes_stream().enumerate().map(move |(index, chunk_result)| match chunk_result {
            Ok(chunk) => {
                log_stream_chunk(index + 1, &String::from_utf8_lossy(&chunk), verbose);
                Ok(chunk.to_vec())
            }
            Err(e) => Err(ApiError::from(RemoteError::transport(format!("Stream error: {}", e)))),
        });

        Ok(Box::pin(byte_stream))
    }
}
