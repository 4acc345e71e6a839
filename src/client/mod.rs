//! Async client for the xAI inference API.

mod builder;
mod core;

pub use self::builder::GrokClientBuilder;
pub use self::core::{ChatOptions, GrokClient, ImageData};
