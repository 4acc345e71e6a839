//! Client configuration, sourced from arguments or the process environment.

use crate::catalog::DEFAULT_CHAT_MODEL;
use crate::retry::RetryPolicy;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::fmt;
use std::time::Duration;

pub const API_KEY_ENV: &str = "XAI_API_KEY";
pub const BASE_URL_ENV: &str = "XAI_BASE_URL";
pub const TIMEOUT_ENV: &str = "XAI_HTTP_TIMEOUT_SECS";
pub const DEFAULT_MODEL_ENV: &str = "DEFAULT_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Fixed default model. When unset, `DEFAULT_MODEL` is consulted on every call.
    pub default_model: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            default_model: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `XAI_API_KEY`, `XAI_BASE_URL` and `XAI_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            api_key,
            base_url,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Model used when a chat call names none.
    pub fn resolve_default_model(&self) -> String {
        self.default_model
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| env::var(DEFAULT_MODEL_ENV).ok().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string())
    }

    /// Base URL without a trailing slash, checked to be an absolute http(s) URL.
    pub(crate) fn validated_base_url(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL '{}': {}", self.base_url, e),
                ErrorContext::new()
                    .with_field_path(BASE_URL_ENV)
                    .with_source("client_config"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("Unsupported base URL scheme '{}'", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path(BASE_URL_ENV)
                    .with_source("client_config"),
            ));
        }
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}
