use crate::catalog::{self, ModelCatalog, ModelDescriptor, DEFAULT_EMBEDDING_MODEL, DEFAULT_VISION_MODEL};
use crate::config::ClientConfig;
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::types::{ChatCompletionRequest, EmbeddingInput, EmbeddingRequest, Message};
use crate::{Error, ErrorContext, Result};
use base64::Engine as _;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::builder::GrokClientBuilder;

const CHAT_PATH: &str = "chat/completions";
const EMBEDDINGS_PATH: &str = "embeddings";

/// Client for the xAI inference API.
///
/// Owns the pooled HTTP connection context. Dropping the client (or calling
/// [`GrokClient::close`]) releases it; ownership makes that happen exactly once,
/// including on early returns through `?`. All operations take `&self`, so one
/// client can serve concurrent calls.
#[derive(Debug)]
pub struct GrokClient {
    transport: HttpTransport,
    catalog: Arc<ModelCatalog>,
    retry: RetryPolicy,
    config: ClientConfig,
}

/// Optional parameters of [`GrokClient::chat_completion`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Image payload: raw bytes, or data that is already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
    Bytes(Vec<u8>),
    Base64(String),
}

impl ImageData {
    pub fn into_base64(self) -> String {
        match self {
            ImageData::Bytes(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
            ImageData::Base64(encoded) => encoded,
        }
    }
}

impl From<Vec<u8>> for ImageData {
    fn from(bytes: Vec<u8>) -> Self {
        ImageData::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageData {
    fn from(bytes: &[u8]) -> Self {
        ImageData::Bytes(bytes.to_vec())
    }
}

impl From<String> for ImageData {
    fn from(encoded: String) -> Self {
        ImageData::Base64(encoded)
    }
}

impl From<&str> for ImageData {
    fn from(encoded: &str) -> Self {
        ImageData::Base64(encoded.to_string())
    }
}

impl GrokClient {
    pub fn builder() -> GrokClientBuilder {
        GrokClientBuilder::new()
    }

    /// Create a client from an explicit key, falling back to `XAI_API_KEY`
    /// when the key is absent or empty.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let mut builder = GrokClientBuilder::from_env();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    pub fn from_env() -> Result<Self> {
        Self::new(None)
    }

    pub(crate) fn from_parts(
        transport: HttpTransport,
        catalog: Arc<ModelCatalog>,
        config: ClientConfig,
    ) -> Self {
        debug!(base_url = transport.base_url(), "opened upstream connection pool");
        Self {
            transport,
            catalog,
            retry: config.retry.clone(),
            config,
        }
    }

    /// Release the connection context now instead of at end of scope.
    pub fn close(self) {
        drop(self);
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Model id for a task complexity hint (`simple`, `complex`, `reasoning`,
    /// `research`). Anything else maps to the lightweight chat model.
    pub fn select_model(&self, task_complexity: Option<&str>) -> &'static str {
        catalog::select_model(task_complexity)
    }

    /// Every catalog entry, in catalog order. Local; never touches the network.
    pub fn list_models(&self) -> Vec<ModelDescriptor> {
        self.catalog.models().to_vec()
    }

    fn ensure_known_model(&self, model: &str) -> Result<()> {
        if self.catalog.contains(model) {
            Ok(())
        } else {
            Err(Error::InvalidModel {
                model: model.to_string(),
                available: self.catalog.ids(),
            })
        }
    }

    /// Send a chat completion and return the upstream JSON body unmodified.
    ///
    /// An unknown `options.model` fails with [`Error::InvalidModel`] before any
    /// request is sent. Without a model, the configured default (or
    /// `DEFAULT_MODEL`, or the lightweight chat model) is used.
    pub async fn chat_completion(&self, messages: &[Message], options: &ChatOptions) -> Result<Value> {
        let model = match &options.model {
            Some(model) => model.clone(),
            None => self.config.resolve_default_model(),
        };
        self.ensure_known_model(&model)?;

        let request = ChatCompletionRequest::new(model.as_str(), messages.to_vec(), options.temperature)
            .with_max_tokens(options.max_tokens);
        let request_id = Uuid::new_v4().to_string();
        info!(
            request_id = request_id.as_str(),
            model = model.as_str(),
            messages = messages.len(),
            "sending chat completion"
        );

        self.post_with_retry("chat_completion", CHAT_PATH, &request, &request_id)
            .await
    }

    /// Ask `model` (default `grok-2-latest`) about an image.
    ///
    /// Raw bytes are base64-encoded; strings are taken as already encoded. The
    /// image is sent as a `data:image/jpeg;base64,...` part after the prompt.
    pub async fn image_understanding(
        &self,
        image: impl Into<ImageData>,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<Value> {
        let encoded = image.into().into_base64();
        let model = model.unwrap_or(DEFAULT_VISION_MODEL);
        debug!(model, encoded_len = encoded.len(), "image understanding request");

        let messages = [Message::user_with_image(prompt, &encoded)];
        self.chat_completion(&messages, &ChatOptions::new().model(model))
            .await
    }

    /// Create embeddings for one text or an ordered list of texts.
    pub async fn create_embeddings(
        &self,
        texts: impl Into<EmbeddingInput>,
        model: Option<&str>,
    ) -> Result<Value> {
        let model = model.unwrap_or(DEFAULT_EMBEDDING_MODEL);
        let request = EmbeddingRequest::new(model, texts);
        if request.input.is_empty() {
            return Err(Error::input_with_context(
                "At least one text is required",
                ErrorContext::new()
                    .with_field_path("texts")
                    .with_source("create_embeddings"),
            ));
        }

        let request_id = Uuid::new_v4().to_string();
        info!(
            request_id = request_id.as_str(),
            model,
            texts = request.input.len(),
            "creating embeddings"
        );

        self.post_with_retry("create_embeddings", EMBEDDINGS_PATH, &request, &request_id)
            .await
    }

    async fn post_with_retry<B: serde::Serialize>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
        request_id: &str,
    ) -> Result<Value> {
        let transport = &self.transport;
        self.retry
            .run(operation, move |attempt| {
                debug!(request_id, attempt, path, "upstream attempt");
                transport.post_json(path, body, request_id)
            })
            .await
    }
}

impl Drop for GrokClient {
    fn drop(&mut self) {
        debug!(base_url = self.transport.base_url(), "released upstream connection pool");
    }
}
