//! MCP tool surface: argument decoding, dispatch, and structured results.
//!
//! Every handler returns a JSON object. Success carries `success: true` plus
//! the tool's payload; failure carries `success: false`, a human-readable
//! `error`, and an `error_type` drawn from [`Error::error_type`]. A fresh
//! [`GrokClient`] is built for each call and released when the handler returns.

mod args;
pub mod prompts;

pub use args::{
    ChatCompletionArgs, CreateEmbeddingsArgs, ImageUnderstandingArgs, ListModelsArgs,
    DEFAULT_IMAGE_PROMPT,
};

use crate::catalog::{self, ModelCatalog};
use crate::client::{ChatOptions, GrokClient, GrokClientBuilder};
use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use base64::Engine as _;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{error, info};

/// URI of the markdown model overview resource.
pub const MODELS_RESOURCE_URI: &str = "models://available";

/// Tool metadata as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDefinition {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

fn failure_body(error: String, error_type: &str) -> Value {
    json!({
        "success": false,
        "error": error,
        "error_type": error_type,
    })
}

fn failure(err: &Error) -> Value {
    let error = match err {
        Error::Io(_) | Error::Serialization(_) => format!("Unexpected error: {err}"),
        _ => err.to_string(),
    };
    failure_body(error, err.error_type())
}

fn file_failure(message: String) -> Value {
    failure_body(message, "file_error")
}

/// Tool handlers bound to one client configuration.
#[derive(Debug, Clone)]
pub struct GrokTools {
    config: ClientConfig,
}

impl GrokTools {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn client(&self) -> Result<GrokClient> {
        GrokClientBuilder::from_config(self.config.clone()).build()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "chat_completion",
                description: "Send a chat completion request to Grok. Pass `model`, or \
                              `task_complexity` (simple, complex, reasoning, research) to \
                              auto-select one.",
                input_schema: args::schema_of::<ChatCompletionArgs>(),
            },
            ToolDefinition {
                name: "image_understanding",
                description: "Analyze an image using Grok's vision capabilities. Provide \
                              either image_path or image_base64, not both.",
                input_schema: args::schema_of::<ImageUnderstandingArgs>(),
            },
            ToolDefinition {
                name: "create_embeddings",
                description: "Create embeddings for one text or a list of texts.",
                input_schema: args::schema_of::<CreateEmbeddingsArgs>(),
            },
            ToolDefinition {
                name: "list_models",
                description: "List all available Grok models with their capabilities and \
                              specifications.",
                input_schema: args::schema_of::<ListModelsArgs>(),
            },
        ]
    }

    /// Decode `arguments` for the named tool and run it.
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };
        match name {
            "chat_completion" => match decode(name, arguments) {
                Ok(args) => self.chat_completion(args).await,
                Err(err) => failure(&err),
            },
            "image_understanding" => match decode(name, arguments) {
                Ok(args) => self.image_understanding(args).await,
                Err(err) => failure(&err),
            },
            "create_embeddings" => match decode(name, arguments) {
                Ok(args) => self.create_embeddings(args).await,
                Err(err) => failure(&err),
            },
            "list_models" => self.list_models(),
            other => failure(&Error::input(format!("Unknown tool: {other}"))),
        }
    }

    pub async fn chat_completion(&self, args: ChatCompletionArgs) -> Value {
        let ChatCompletionArgs {
            messages,
            model,
            task_complexity,
            temperature,
            max_tokens,
        } = args;
        let model = model.filter(|m| !m.is_empty());
        let task_complexity = task_complexity.filter(|t| !t.is_empty());
        let model = match (model, task_complexity.as_deref()) {
            (Some(model), _) => model,
            (None, Some(complexity)) => {
                let model = catalog::select_model(Some(complexity));
                info!(model, task_complexity = complexity, "auto-selected model");
                model.to_string()
            }
            (None, None) => self.config.resolve_default_model(),
        };

        let mut options = ChatOptions::new().model(model.as_str()).temperature(temperature);
        options.max_tokens = max_tokens;

        let outcome = async {
            let client = self.client()?;
            client.chat_completion(&messages, &options).await
        }
        .await;

        match outcome {
            Ok(response) => json!({
                "success": true,
                "model_used": model,
                "response": response,
            }),
            Err(err) => {
                error!(tool = "chat_completion", error = %err, "tool call failed");
                failure(&err)
            }
        }
    }

    pub async fn image_understanding(&self, args: ImageUnderstandingArgs) -> Value {
        let ImageUnderstandingArgs {
            image_path,
            image_base64,
            prompt,
            model,
        } = args;
        let image_path = image_path.filter(|p| !p.is_empty());
        let image_base64 = image_base64.filter(|b| !b.is_empty());
        let image = if let Some(path) = image_path.as_deref() {
            match tokio::fs::read(Path::new(path)).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return file_failure(format!("Image file not found: {path}"));
                }
                Err(e) => return file_failure(format!("Failed to read image file {path}: {e}")),
            }
        } else if let Some(encoded) = image_base64.as_deref() {
            match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    return failure(&Error::input_with_context(
                        "Invalid base64 image data",
                        ErrorContext::new()
                            .with_field_path("image_base64")
                            .with_details(e.to_string()),
                    ));
                }
            }
        } else {
            return failure(&Error::input("Must provide either image_path or image_base64"));
        };

        info!(model = model.as_str(), bytes = image.len(), "analyzing image");
        let outcome = async {
            let client = self.client()?;
            client
                .image_understanding(image, &prompt, Some(model.as_str()))
                .await
        }
        .await;

        match outcome {
            Ok(response) => json!({
                "success": true,
                "model_used": model,
                "response": response,
            }),
            Err(err) => {
                error!(tool = "image_understanding", error = %err, "tool call failed");
                failure(&err)
            }
        }
    }

    pub async fn create_embeddings(&self, args: CreateEmbeddingsArgs) -> Value {
        let CreateEmbeddingsArgs { texts, model } = args;
        info!(texts = texts.len(), model = model.as_str(), "creating embeddings");
        let outcome = async {
            let client = self.client()?;
            client.create_embeddings(texts, Some(model.as_str())).await
        }
        .await;

        match outcome {
            Ok(embeddings) => json!({
                "success": true,
                "model_used": model,
                "embeddings": embeddings,
            }),
            Err(err) => {
                error!(tool = "create_embeddings", error = %err, "tool call failed");
                failure(&err)
            }
        }
    }

    /// Catalog listing. Served from the static catalog, so it needs neither
    /// an API key nor the network.
    pub fn list_models(&self) -> Value {
        let catalog = ModelCatalog::builtin();
        json!({
            "success": true,
            "models": catalog.models(),
            "model_count": catalog.len(),
        })
    }

    pub fn resources(&self) -> Vec<ResourceDefinition> {
        vec![ResourceDefinition {
            uri: MODELS_RESOURCE_URI,
            name: "Available models",
            description: "Information about available Grok models.",
            mime_type: "text/markdown",
        }]
    }

    pub fn read_resource(&self, uri: &str) -> Option<String> {
        (uri == MODELS_RESOURCE_URI).then(|| ModelCatalog::builtin().to_markdown())
    }
}

fn decode<T: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| {
        Error::input_with_context(
            format!("Invalid arguments for {tool}"),
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("tools"),
        )
    })
}
