//! # grok-mcp
//!
//! Async adapter for the xAI (Grok) inference API, plus the Model Context
//! Protocol tool surface that exposes it to MCP clients.
//!
//! ## Overview
//!
//! [`GrokClient`] wraps the OpenAI-compatible xAI REST API: chat completion,
//! image understanding and embeddings. It validates model names against a
//! static catalog before any request leaves the process, and retries upstream
//! failures with exponential backoff ([`RetryPolicy`]). The [`tools`] and
//! [`server`] modules turn those operations into MCP tools served over stdio.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grok_mcp::{ChatOptions, GrokClient, Message};
//!
//! #[tokio::main]
//! async fn main() -> grok_mcp::Result<()> {
//!     let client = GrokClient::builder().api_key("xai-...").build()?;
//!
//!     let model = client.select_model(Some("reasoning"));
//!     let response = client
//!         .chat_completion(&[Message::user("Why is the sky blue?")], &ChatOptions::new().model(model))
//!         .await?;
//!     println!("{}", response["choices"][0]["message"]["content"]);
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The adapter and its builder |
//! | [`catalog`] | Model catalog and task-based selection |
//! | [`config`] | Environment-driven client configuration |
//! | [`retry`] | Retry policy with exponential backoff |
//! | [`transport`] | Authenticated JSON-over-HTTP transport |
//! | [`types`] | Messages and request bodies |
//! | [`tools`] | MCP tool handlers, prompts and resources |
//! | [`server`] | JSON-RPC 2.0 stdio server |

pub mod catalog;
pub mod client;
pub mod config;
pub mod retry;
pub mod server;
pub mod tools;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use catalog::{select_model, ModelCatalog, ModelDescriptor, TaskComplexity};
pub use client::{ChatOptions, GrokClient, GrokClientBuilder, ImageData};
pub use config::ClientConfig;
pub use retry::{ResiliencePolicy, RetryPolicy};
pub use tools::GrokTools;
pub use types::{
    message::{ContentPart, Message, MessageContent, MessageRole},
    request::EmbeddingInput,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
