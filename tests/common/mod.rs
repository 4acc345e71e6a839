//! Mock HTTP server setup for integration tests
#![allow(dead_code)]

use grok_mcp::{ClientConfig, GrokClient, GrokTools, RetryPolicy};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const TEST_API_KEY: &str = "test-api-key";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client configuration pointing at the mock server, with millisecond backoff
    pub fn config(&self) -> ClientConfig {
        test_config(&self.base_url)
    }

    pub fn create_test_client(&self) -> grok_mcp::Result<GrokClient> {
        GrokClient::builder()
            .api_key(TEST_API_KEY)
            .base_url(&self.base_url)
            .retry_policy(fast_retry())
            .build()
    }

    pub fn create_test_tools(&self) -> GrokTools {
        GrokTools::new(self.config())
    }

    /// Create a mock for a successful JSON response
    pub async fn mock_json_response(&self, path: &str, status: u16, body: &Value) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .with_status(status as usize)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Create a mock for an error response that must be hit exactly `hits` times
    pub async fn mock_error_response(
        &self,
        path: &str,
        status: u16,
        error_body: &str,
        hits: usize,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .with_status(status as usize)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Like [`mock_json_response`](Self::mock_json_response), but only matches
    /// requests whose body contains `expected`.
    pub async fn mock_json_matching(&self, path: &str, expected: Value, body: &Value) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .match_header("authorization", format!("Bearer {TEST_API_KEY}").as_str())
            .match_body(Matcher::PartialJson(expected))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::default().with_unit(Duration::from_millis(1))
}

pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new()
        .with_api_key(TEST_API_KEY)
        .with_base_url(base_url)
        .with_retry(fast_retry())
}

pub fn chat_completion_response(model: &str, content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
    })
}

pub fn embeddings_response(count: usize) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| json!({ "object": "embedding", "index": i, "embedding": [0.1, 0.2, 0.3] }))
        .collect();
    json!({ "object": "list", "data": data, "model": "text-embedding-3-small" })
}
