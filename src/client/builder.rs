use crate::catalog::ModelCatalog;
use crate::client::core::GrokClient;
use crate::config::{ClientConfig, API_KEY_ENV};
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`GrokClient`].
///
/// Starts from [`ClientConfig::default`]; use [`GrokClientBuilder::from_env`]
/// to pick up `XAI_API_KEY` and the other environment settings.
pub struct GrokClientBuilder {
    config: ClientConfig,
    catalog: Option<Arc<ModelCatalog>>,
}

impl GrokClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            catalog: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            catalog: None,
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = Some(model.into());
        self
    }

    /// Replace the built-in model catalog.
    pub fn catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<GrokClient> {
        let api_key = self
            .config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!("{} not found in environment variables", API_KEY_ENV),
                    ErrorContext::new()
                        .with_field_path(API_KEY_ENV)
                        .with_source("client_builder"),
                )
            })?;
        let base_url = self.config.validated_base_url()?;
        let transport = HttpTransport::new(base_url, &api_key, self.config.timeout)?;
        let catalog = self.catalog.unwrap_or_else(ModelCatalog::builtin);

        Ok(GrokClient::from_parts(transport, catalog, self.config))
    }
}

impl Default for GrokClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
