//! grok-mcp: MCP server exposing the xAI Grok API as tools
//!
//! Usage:
//!   grok-mcp [serve]     Serve MCP over stdin/stdout
//!   grok-mcp models      Print the model catalog
//!   grok-mcp version     Show version information

use anyhow::Context;
use grok_mcp::config::API_KEY_ENV;
use grok_mcp::server::McpServer;
use grok_mcp::{GrokTools, ModelCatalog};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str).unwrap_or("serve") {
        "serve" => cmd_serve().await,
        "models" => {
            print!("{}", ModelCatalog::builtin().to_markdown());
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("grok-mcp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"grok-mcp - MCP server for xAI Grok models

USAGE:
    grok-mcp [COMMAND]

COMMANDS:
    serve       Serve MCP over stdin/stdout (default)
    models      Print the model catalog as markdown
    version     Show version information
    help        Show this help message

ENVIRONMENT:
    XAI_API_KEY             API key (required to serve)
    XAI_BASE_URL            API base URL (default https://api.x.ai/v1)
    XAI_HTTP_TIMEOUT_SECS   Per-request timeout in seconds (default 60)
    DEFAULT_MODEL           Chat model used when none is requested
    DEBUG                   Set to "true" for debug logging
    RUST_LOG                Log filter, overrides DEBUG"#
    );
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing() {
    let debug = std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn cmd_serve() -> anyhow::Result<()> {
    let tools = GrokTools::from_env();
    if tools.config().api_key.is_none() {
        error!("{API_KEY_ENV} not found in environment variables!");
        error!("Please set your Grok API key in the .env file or environment");
        std::process::exit(1);
    }

    info!("Starting Grok MCP Server...");
    info!(
        "Available models: {}",
        ModelCatalog::builtin().ids().join(", ")
    );

    McpServer::new(tools)
        .serve_stdio()
        .await
        .context("MCP stdio server failed")
}
