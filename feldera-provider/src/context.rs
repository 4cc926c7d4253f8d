//! Provider context: configuration and the API client, built once and
//! shared read-only by every reconciler.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::client::{HttpProgramClient, ProgramApi};
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};

/// Path prefix of the API version this provider speaks.
pub const API_PREFIX: &str = "/v0";

/// Shared provider state. Immutable after construction.
pub struct ProviderContext {
    endpoint: String,
    client: Arc<dyn ProgramApi>,
}

impl ProviderContext {
    /// Validate `config` and build the HTTP client for `{endpoint}/v0`.
    pub fn configure(config: &ProviderConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ProviderError::Configuration("endpoint is required".to_string()))?;

        let url = reqwest::Url::parse(endpoint).map_err(|e| {
            ProviderError::Configuration(format!("invalid endpoint {:?}: {}", endpoint, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ProviderError::Configuration(format!(
                "invalid endpoint {:?}: unsupported scheme {:?}",
                endpoint,
                url.scheme()
            )));
        }

        let base_url = format!("{}{}", endpoint.trim_end_matches('/'), API_PREFIX);
        let client = HttpProgramClient::new(&base_url).map_err(|e| {
            ProviderError::Configuration(format!(
                "error creating client for Feldera API, error: {}",
                e
            ))
        })?;

        info!("Configured Feldera API client: {}", base_url);
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: Arc::new(client),
        })
    }

    /// Build a context around an existing client.
    pub fn with_client(endpoint: impl Into<String>, client: Arc<dyn ProgramApi>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn client(&self) -> &dyn ProgramApi {
        self.client.as_ref()
    }
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
