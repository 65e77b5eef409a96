use std::sync::Arc;

use crate::client::CohereClient;
use crate::config::{ClientConfig, Credential};
use crate::error::ApiError;
use crate::transport::{HttpTransport, Transport};

/// Client factory for creating Cohere clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client that talks HTTP to `config.base_url`
    ///
    /// # Arguments
    /// * `config` - Credential, base URL, timeout and logging settings
    ///
    /// # Returns
    /// A cloneable client backed by [`HttpTransport`]
    pub fn create(config: &ClientConfig) -> Result<CohereClient, ApiError> {
        let transport = HttpTransport::new(config)?;
        Ok(CohereClient::new(Arc::new(transport), config.credential.clone()))
    }

    /// Create a client over any transport, e.g. a stub in tests
    pub fn with_transport(transport: Arc<dyn Transport>, credential: Credential) -> CohereClient {
        CohereClient::new(transport, credential)
    }
}
