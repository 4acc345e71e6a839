//! Wire types shared by the client and the tool surface.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`message`] | Chat messages with text or multi-part (text + image) content |
//! | [`request`] | Outbound chat completion and embedding request bodies |

pub mod message;
pub mod request;

pub use message::{ContentPart, ImageUrl, Message, MessageContent, MessageRole};
pub use request::{ChatCompletionRequest, EmbeddingInput, EmbeddingRequest};
