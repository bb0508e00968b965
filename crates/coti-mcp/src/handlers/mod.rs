//! MCP request handlers
//!
//! Routing for the protocol methods this server speaks: lifecycle
//! (initialize, ping), tools/list and tools/call, and the lifecycle
//! notifications. Tool failures never surface here as JSON-RPC errors;
//! they come back as successful responses carrying an error envelope.

use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::tools::{self, ToolContext};

/// MCP Server state
pub struct McpServerState {
    /// Protocol version negotiated with the client
    pub protocol_version: Option<String>,

    /// Whether the client has completed the initialize handshake
    pub initialized: bool,

    /// Client capabilities
    pub client_capabilities: Option<ClientCapabilities>,

    /// Client info
    pub client_info: Option<ClientInfo>,

    /// Shared tool context (registry, network selector, client seam)
    pub tool_context: ToolContext,
}

impl McpServerState {
    pub fn new(tool_context: ToolContext) -> Self {
        Self {
            protocol_version: None,
            initialized: false,
            client_capabilities: None,
            client_info: None,
            tool_context,
        }
    }
}

/// Handle an incoming JSON-RPC request
pub async fn handle_request(
    state: &mut McpServerState,
    request: &JsonRpcRequest,
) -> JsonRpcResponse {
    debug!("Handling request: {} (id: {})", request.method, request.id);

    // Only initialize and ping are allowed before the handshake completes.
    if !state.initialized && request.method != "initialize" && request.method != "ping" {
        return JsonRpcResponse::error(request.id.clone(), JsonRpcError::not_initialized());
    }

    let result = match request.method.as_str() {
        "initialize" => handle_initialize(state, request).await,
        "ping" => handle_ping().await,
        "tools/list" => handle_tools_list(state, request).await,
        "tools/call" => handle_tools_call(state, request).await,
        _ => Err(JsonRpcError::method_not_found(&request.method)),
    };

    match result {
        Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
        Err(error) => JsonRpcResponse::error(request.id.clone(), error),
    }
}

/// Handle an incoming notification
pub async fn handle_notification(state: &mut McpServerState, notification: &JsonRpcNotification) {
    debug!("Handling notification: {}", notification.method);

    match notification.method.as_str() {
        "notifications/initialized" => {
            info!("Client completed initialization");
            state.initialized = true;
        }
        "notifications/cancelled" => {
            if let Some(request_id) = notification
                .params
                .as_ref()
                .and_then(|p| p.get("requestId"))
            {
                warn!("Request cancelled: {:?}", request_id);
            }
        }
        _ => {
            debug!("Ignoring unknown notification: {}", notification.method);
        }
    }
}

async fn handle_initialize(
    state: &mut McpServerState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: InitializeParams = request
        .params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params("Missing params"))
        .and_then(|p| {
            serde_json::from_value(p.clone())
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
        })?;

    info!(
        "Initialize request from {} (version: {})",
        params.client_info.name, params.protocol_version
    );

    if params.protocol_version != MCP_PROTOCOL_VERSION {
        // Accepted anyway; the response states the version we speak.
        warn!(
            "Protocol version mismatch: client={}, server={}",
            params.protocol_version, MCP_PROTOCOL_VERSION
        );
    }

    state.protocol_version = Some(params.protocol_version.clone());
    state.client_capabilities = Some(params.capabilities);
    state.client_info = Some(params.client_info);

    let result = InitializeResult::new(MCP_PROTOCOL_VERSION.to_string());
    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

async fn handle_ping() -> Result<serde_json::Value, JsonRpcError> {
    Ok(serde_json::json!({}))
}

async fn handle_tools_list(
    _state: &McpServerState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let _params: ToolsListParams = request
        .params
        .as_ref()
        .map(|p| serde_json::from_value(p.clone()))
        .transpose()
        .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?
        .unwrap_or_default();

    let result = ToolsListResult {
        tools: tools::get_all_tools(),
        next_cursor: None,
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

async fn handle_tools_call(
    state: &McpServerState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: ToolsCallParams = request
        .params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params("Missing params"))
        .and_then(|p| {
            serde_json::from_value(p.clone())
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
        })?;

    debug!("Calling tool: {}", params.name);

    let result = tools::execute_tool(&state.tool_context, &params.name, params.arguments).await;
    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
