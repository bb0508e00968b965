//! MCP Protocol implementation
//!
//! Types for the Model Context Protocol surface this server speaks:
//! JSON-RPC 2.0 framing, lifecycle negotiation, and tool messages.

pub mod capabilities;
pub mod jsonrpc;
pub mod lifecycle;
pub mod messages;

pub use capabilities::*;
pub use jsonrpc::*;
pub use lifecycle::*;
pub use messages::*;
