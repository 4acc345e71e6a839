//! Tool handlers and the stdio server against a mock upstream.

mod common;

use common::{chat_completion_response, embeddings_response, test_config, MockServerFixture};
use grok_mcp::server::McpServer;
use grok_mcp::GrokTools;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_chat_tool_auto_selects_model() {
    let fixture = MockServerFixture::new().await;
    let upstream = chat_completion_response("grok-3-reasoner", "Step 1...");
    let mock = fixture
        .mock_json_matching("/chat/completions", json!({"model": "grok-3-reasoner"}), &upstream)
        .await;

    let result = fixture
        .create_test_tools()
        .call(
            "chat_completion",
            json!({
                "messages": [{"role": "user", "content": "Prove it"}],
                "task_complexity": "reasoning"
            }),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result["success"], true);
    assert_eq!(result["model_used"], "grok-3-reasoner");
    assert_eq!(result["response"], upstream);
}

#[tokio::test]
async fn test_chat_tool_explicit_model_wins() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "/chat/completions",
            json!({"model": "grok-3", "temperature": 1.5, "max_tokens": 10}),
            &chat_completion_response("grok-3", "hi"),
        )
        .await;

    let result = fixture
        .create_test_tools()
        .call(
            "chat_completion",
            json!({
                "messages": [{"role": "user", "content": "Hi"}],
                "model": "grok-3",
                "task_complexity": "research",
                "temperature": 1.5,
                "max_tokens": 10
            }),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result["model_used"], "grok-3");
}

#[tokio::test]
async fn test_chat_tool_reports_api_error() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response("/chat/completions", 401, r#"{"error":"invalid key"}"#, 3)
        .await;

    let result = fixture
        .create_test_tools()
        .call(
            "chat_completion",
            json!({"messages": [{"role": "user", "content": "Hi"}], "model": "grok-3"}),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result["success"], false);
    assert_eq!(result["error_type"], "api_error");
    assert!(result["error"].as_str().unwrap().contains("HTTP 401"));
}

#[tokio::test]
async fn test_image_tool_reads_file() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "/chat/completions",
            json!({
                "model": "grok-2-latest",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "What do you see in this image?"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                    ]
                }]
            }),
            &chat_completion_response("grok-2-latest", "letters"),
        )
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"ABC").unwrap();
    let result = fixture
        .create_test_tools()
        .call(
            "image_understanding",
            json!({"image_path": file.path().to_string_lossy()}),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result["success"], true);
    assert_eq!(result["model_used"], "grok-2-latest");
}

#[tokio::test]
async fn test_image_tool_decodes_inline_base64() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "/chat/completions",
            json!({
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Describe"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                    ]
                }]
            }),
            &chat_completion_response("grok-2-latest", "letters"),
        )
        .await;

    let result = fixture
        .create_test_tools()
        .call(
            "image_understanding",
            json!({"image_base64": "QUJD", "prompt": "Describe"}),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result["success"], true);
}

#[tokio::test]
async fn test_embeddings_tool() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "/embeddings",
            json!({"model": "text-embedding-3-small", "input": ["one", "two"]}),
            &embeddings_response(2),
        )
        .await;

    let result = fixture
        .create_test_tools()
        .call("create_embeddings", json!({"texts": ["one", "two"]}))
        .await;

    mock.assert_async().await;
    assert_eq!(result["success"], true);
    assert_eq!(result["model_used"], "text-embedding-3-small");
    assert_eq!(result["embeddings"]["data"][1]["index"], 1);
}

#[tokio::test]
async fn test_stdio_session() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            "/chat/completions",
            200,
            &chat_completion_response("grok-3", "pong"),
        )
        .await;

    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
            "name": "chat_completion",
            "arguments": {"messages": [{"role": "user", "content": "ping"}], "model": "grok-3"}
        }}),
        json!({"jsonrpc": "2.0", "id": 4, "method": "resources/read", "params": {"uri": "models://available"}}),
    ]
    .iter()
    .map(|m| format!("{m}\n"))
    .collect::<String>();

    let mut output = Vec::new();
    McpServer::new(fixture.create_test_tools())
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let replies = replies_by_id(output);
    assert_eq!(replies.len(), 4);
    assert_eq!(replies[&1]["result"]["serverInfo"]["name"], "grok-mcp");

    let tools = replies[&2]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 4);
    assert!(tools.iter().all(|t| t["inputSchema"].is_object()));

    assert_eq!(replies[&3]["result"]["isError"], false);
    let payload: Value =
        serde_json::from_str(replies[&3]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["response"]["choices"][0]["message"]["content"], "pong");

    let markdown = replies[&4]["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(markdown.contains("## Grok 3 Mini Beta (grok-3-mini-beta)"));
}

#[tokio::test]
async fn test_slow_tool_call_does_not_block_ping() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_response("grok-3", "late"))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {
            "name": "chat_completion",
            "arguments": {"messages": [{"role": "user", "content": "take your time"}], "model": "grok-3"}
        }}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
    ]
    .iter()
    .map(|m| format!("{m}\n"))
    .collect::<String>();

    let mut output = Vec::new();
    McpServer::new(GrokTools::new(test_config(&upstream.uri())))
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let order: Vec<u64> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["id"].as_u64().unwrap())
        .collect();
    assert_eq!(order, vec![2, 1]);
}

fn replies_by_id(output: Vec<u8>) -> HashMap<u64, Value> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap())
        .map(|reply| (reply["id"].as_u64().unwrap(), reply))
        .collect()
}
