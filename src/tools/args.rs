//! Tool argument types. Their JSON Schemas are published as MCP `inputSchema`s.

use crate::catalog::{DEFAULT_EMBEDDING_MODEL, DEFAULT_VISION_MODEL};
use crate::types::{EmbeddingInput, Message};
use schemars::JsonSchema;
use serde::Deserialize;

pub const DEFAULT_IMAGE_PROMPT: &str = "What do you see in this image?";

fn default_temperature() -> f64 {
    0.7
}

fn default_image_prompt() -> String {
    DEFAULT_IMAGE_PROMPT.to_string()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

/// Send a chat completion request to Grok.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ChatCompletionArgs {
    /// Conversation as a list of `{role, content}` messages.
    pub messages: Vec<Message>,
    /// Specific Grok model (e.g. `grok-3`, `grok-3-reasoner`).
    #[serde(default)]
    pub model: Option<String>,
    /// Auto-select a model: `simple`, `complex`, `reasoning` or `research`.
    #[serde(default)]
    pub task_complexity: Option<String>,
    /// Sampling temperature (0.0 to 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens in the response.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Analyze an image. Provide either `image_path` or `image_base64`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ImageUnderstandingArgs {
    /// Path to a local image file.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Base64-encoded image data.
    #[serde(default)]
    pub image_base64: Option<String>,
    /// Question or instruction about the image.
    #[serde(default = "default_image_prompt")]
    pub prompt: String,
    /// Vision-capable Grok model.
    #[serde(default = "default_vision_model")]
    pub model: String,
}

/// Create embeddings for one text or a list of texts.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEmbeddingsArgs {
    /// A single text or a list of texts.
    pub texts: EmbeddingInput,
    /// Embedding model.
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

/// List all available Grok models with their capabilities.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListModelsArgs {}

pub(crate) fn schema_of<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}))
}
