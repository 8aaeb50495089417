/// Meridian MCP Connector - JSON-RPC (stdio) + HTTP API
///
/// Dual-protocol server over the same operation table:
/// 1. JSON-RPC over stdin/stdout (for direct MCP tool calling)
/// 2. HTTP endpoints (for remote/network access, bearer-key protected)
///
/// Run with HTTP:     ./meridian-mcp (default)
/// Run with JSON-RPC: MCP_SERVER_MODE=jsonrpc ./meridian-mcp

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::io::{self, BufRead};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use meridian_client::{MeridianClient, MeridianConfig};
use meridian_core::registry;
use meridian_mcp::{app, tool_listing, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenv::dotenv();

    let config = MeridianConfig::from_env()?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let client = MeridianClient::new(&config)?;

    let mode = std::env::var("MCP_SERVER_MODE").unwrap_or_else(|_| "http".to_string());
    match mode.as_str() {
        "jsonrpc" => run_jsonrpc_server(client).await,
        "http" => start_http_server(client).await,
        other => Err(anyhow!("unsupported MCP_SERVER_MODE: {other}")),
    }
}

async fn run_jsonrpc_server(client: MeridianClient) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock().lines();

    // Read JSON-RPC messages from stdin
    while let Some(Ok(line)) = reader.next() {
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Parse error: {e}");
                continue;
            }
        };

        let id = request.get("id").cloned().unwrap_or(json!(null));
        let Some(method) = request.get("method").and_then(|v| v.as_str()) else {
            continue;
        };

        let response = match method {
            "initialize" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2024-11",
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": "meridian-mcp",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }
            }),

            "tools/list" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": tool_listing()
            }),

            "tools/call" => {
                let params = request.get("params").cloned().unwrap_or(json!({}));
                let name = params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                let args = params.get("arguments").cloned().unwrap_or(json!({}));

                if registry::find(name).is_none() {
                    json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {
                            "code": -32601,
                            "message": format!("Unknown tool: {name}")
                        }
                    })
                } else {
                    // Failures stay inside the envelope; the JSON-RPC call
                    // itself succeeds either way.
                    let envelope = client.call(name, args).await;
                    let text =
                        serde_json::to_string(&envelope).expect("envelope serializes");
                    json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": {
                            "content": [{
                                "type": "text",
                                "text": text
                            }]
                        }
                    })
                }
            }

            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": -32601,
                    "message": format!("Method not found: {method}")
                }
            }),
        };

        println!("{response}");
    }

    Ok(())
}

async fn start_http_server(client: MeridianClient) -> Result<()> {
    let api_key = std::env::var("MCP_API_KEY")
        .map_err(|_| anyhow!("MCP_API_KEY environment variable not set"))?;

    let port = std::env::var("MCP_HTTP_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .unwrap_or(8080);

    let state = Arc::new(AppState { client, api_key });
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║              Meridian MCP Connector - HTTP API             ║");
    println!("╚════════════════════════════════════════════════════════════╝\n");
    println!("✓ Server listening on http://0.0.0.0:{port}\n");
    println!("Endpoints:");
    println!("  GET  http://localhost:{port}/health");
    println!("  GET  http://localhost:{port}/tools");
    println!("  POST http://localhost:{port}/tools/{{name}}");
    println!("  *    http://localhost:{port}/api/v5/entity/... (REST aliases)\n");

    axum::serve(listener, router).await?;

    Ok(())
}
