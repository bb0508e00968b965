//! COTI MCP Server
//!
//! A Model Context Protocol server exposing COTI account management and
//! privacy operations to MCP-compatible AI agents: a multi-account
//! credential registry, network selection, native transfers, message
//! signing, and value encryption under per-account AES keys.
//!
//! Blockchain access goes through the [`coti_core::client::WalletClient`]
//! seam; this crate wires either a production client or the deterministic
//! mock into the tool context at startup.
//!
//! # Transport
//!
//! stdio only: newline-delimited JSON-RPC 2.0 on stdin/stdout, logging
//! on stderr.
//!
//! # Example Usage
//!
//! ```no_run
//! use coti_mcp::McpServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = McpServer::with_mock();
//!     server.run_stdio().await.expect("Server failed");
//! }
//! ```

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::{
    ClientCapabilities, ClientInfo, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, Tool, ToolContent, ToolsCallResult,
};
pub use server::McpServer;
pub use tools::ToolContext;
