//! MCP Server implementation
//!
//! Owns the server state and runs the stdio message loop.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::handlers::{handle_notification, handle_request, McpServerState};
use crate::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use crate::tools::ToolContext;
use crate::transport::stdio::AsyncStdioTransport;

/// MCP Server
pub struct McpServer {
    state: Arc<RwLock<McpServerState>>,
}

impl McpServer {
    /// Create a server over the given tool context.
    pub fn new(tool_context: ToolContext) -> Self {
        Self {
            state: Arc::new(RwLock::new(McpServerState::new(tool_context))),
        }
    }

    /// A server wired to the mock wallet client and seeded accounts.
    pub fn with_mock() -> Self {
        Self::new(ToolContext::mock())
    }

    /// Run the server using stdio transport
    pub async fn run_stdio(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Starting COTI MCP server (stdio transport)");

        let mut transport = AsyncStdioTransport::new();

        loop {
            let message = match transport.read_message().await {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    info!("EOF received, shutting down");
                    break;
                }
                Err(e) => {
                    error!("Error reading message: {}", e);
                    continue;
                }
            };

            let parsed: Result<serde_json::Value, _> = serde_json::from_str(&message);
            let json = match parsed {
                Ok(v) => v,
                Err(e) => {
                    warn!("Failed to parse JSON: {}", e);
                    let error_response = JsonRpcResponse::error(
                        crate::protocol::RequestId::Null,
                        crate::protocol::JsonRpcError::parse_error(),
                    );
                    if let Err(e) = transport.write_response(&error_response).await {
                        error!("Failed to write error response: {}", e);
                    }
                    continue;
                }
            };

            if json.get("id").is_some() && json.get("method").is_some() {
                let request: JsonRpcRequest = match serde_json::from_value(json) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("Failed to parse request: {}", e);
                        continue;
                    }
                };

                let mut state = self.state.write().await;
                let response = handle_request(&mut state, &request).await;

                if let Err(e) = transport.write_response(&response).await {
                    error!("Failed to write response: {}", e);
                }
            } else if json.get("method").is_some() {
                let notification: JsonRpcNotification = match serde_json::from_value(json) {
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Failed to parse notification: {}", e);
                        continue;
                    }
                };

                let mut state = self.state.write().await;
                handle_notification(&mut state, &notification).await;
            } else if json.get("result").is_some() || json.get("error").is_some() {
                // A response to a server-initiated request; this server
                // never sends any, so nothing to correlate.
                debug!("Received response from client (ignored)");
            } else {
                warn!("Unknown message type: {:?}", json);
            }
        }

        info!("COTI MCP server stopped");
        Ok(())
    }
}
