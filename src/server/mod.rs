//! MCP server over stdio: one JSON-RPC message per line in, one per line out.

pub mod jsonrpc;

use crate::tools::{prompts, GrokTools};
use crate::Result;
use jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "grok-mcp";

/// Dispatches MCP requests to the Grok tool handlers.
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: GrokTools,
}

impl McpServer {
    pub fn new(tools: GrokTools) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &GrokTools {
        &self.tools
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Read requests until `reader` closes. Each request runs as its own
    /// task, so a slow tool call does not hold back the lines after it;
    /// replies are written by this task alone, one per line, in completion order.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(server = SERVER_NAME, "serving MCP over stdio");
        let mut lines = reader.lines();
        let mut in_flight: JoinSet<Option<JsonRpcResponse>> = JoinSet::new();
        let mut input_open = true;

        while input_open || !in_flight.is_empty() {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let server = self.clone();
                        in_flight.spawn(async move { server.handle_line(&line).await });
                    }
                    None => {
                        info!(pending = in_flight.len(), "input closed, draining requests");
                        input_open = false;
                    }
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => match joined {
                    Ok(Some(reply)) => write_reply(&mut writer, &reply).await?,
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "request task failed"),
                },
            }
        }
        info!("shutting down");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparsable message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                error_codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = request.method.as_str(), "request");
        let Some(id) = request.id.clone() else {
            debug!(method = request.method.as_str(), "notification");
            return None;
        };
        let params = request.params.unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.definitions() })),
            "tools/call" => self.call_tool(params).await,
            "resources/list" => Ok(json!({ "resources": self.tools.resources() })),
            "resources/read" => self.read_resource(&params),
            "prompts/list" => Ok(json!({ "prompts": prompts::templates() })),
            "prompts/get" => self.get_prompt(&params),
            other => Err((
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err((code, message)) => JsonRpcResponse::failure(id, code, message),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {},
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    async fn call_tool(&self, params: Value) -> std::result::Result<Value, (i32, String)> {
        let name = required_str(&params, "name")?.to_string();
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        info!(tool = name.as_str(), "tool call");
        let result = self.tools.call(&name, arguments).await;
        let is_error = result.get("success") == Some(&Value::Bool(false));
        Ok(json!({
            "content": [{ "type": "text", "text": result.to_string() }],
            "isError": is_error,
        }))
    }

    fn read_resource(&self, params: &Value) -> std::result::Result<Value, (i32, String)> {
        let uri = required_str(params, "uri")?;
        let text = self.tools.read_resource(uri).ok_or_else(|| {
            (error_codes::INVALID_PARAMS, format!("Unknown resource: {uri}"))
        })?;
        Ok(json!({
            "contents": [{ "uri": uri, "mimeType": "text/markdown", "text": text }],
        }))
    }

    fn get_prompt(&self, params: &Value) -> std::result::Result<Value, (i32, String)> {
        let name = required_str(params, "name")?;
        let arguments: Map<String, Value> = params
            .get("arguments")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let template = prompts::templates()
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| (error_codes::INVALID_PARAMS, format!("Unknown prompt: {name}")))?;
        let text = prompts::render(name, &arguments)
            .ok_or_else(|| (error_codes::INVALID_PARAMS, format!("Unknown prompt: {name}")))?;
        Ok(json!({
            "description": template.description,
            "messages": [{ "role": "user", "content": { "type": "text", "text": text } }],
        }))
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(writer: &mut W, reply: &JsonRpcResponse) -> Result<()> {
    let mut out = serde_json::to_vec(reply)?;
    out.push(b'\n');
    writer.write_all(&out).await?;
    writer.flush().await?;
    Ok(())
}

fn required_str<'a>(params: &'a Value, key: &str) -> std::result::Result<&'a str, (i32, String)> {
    params.get(key).and_then(Value::as_str).ok_or_else(|| {
        (
            error_codes::INVALID_PARAMS,
            format!("Missing string parameter '{key}'"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn server() -> McpServer {
        McpServer::new(GrokTools::new(ClientConfig::new()))
    }

    #[tokio::test]
    async fn test_initialize() {
        let reply = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = reply.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "grok-mcp");
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let reply = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_error_codes() {
        let s = server();
        let parse = s.handle_line("{not json").await.unwrap();
        assert_eq!(parse.error.unwrap().code, error_codes::PARSE_ERROR);

        let invalid = s.handle_line(r#"{"jsonrpc":"2.0","id":2}"#).await.unwrap();
        assert_eq!(invalid.id, json!(2));
        assert_eq!(invalid.error.unwrap().code, error_codes::INVALID_REQUEST);

        let unknown = s
            .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"sampling/createMessage"}"#)
            .await
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

        let missing = s
            .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(missing.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_list_models_tool_call() {
        let reply = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"list_models"}}"#,
            )
            .await
            .unwrap();
        let result = reply.result.unwrap();
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["model_count"], 5);
    }

    #[tokio::test]
    async fn test_prompt_get() {
        let reply = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":6,"method":"prompts/get","params":{"name":"code_review","arguments":{"language":"Go"}}}"#,
            )
            .await
            .unwrap();
        let result = reply.result.unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("expert Go code reviewer"));
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_reply() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let mut lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        lines.sort_by_key(|l| l["id"].as_u64());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
        assert_eq!(lines[1]["result"]["resources"][0]["uri"], "models://available");
    }
}
