//! stdio transport for MCP
//!
//! Newline-delimited JSON over stdin/stdout. Logging goes to stderr;
//! stdout carries only protocol messages.

use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::protocol::JsonRpcResponse;

/// Async stdio transport using tokio
pub struct AsyncStdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl AsyncStdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }

    /// Read a single message from stdin. `None` means EOF or a blank line.
    pub async fn read_message(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let line = line.trim_end().to_string();

        if line.is_empty() {
            return Ok(None);
        }

        trace!("Received: {}", line);
        Ok(Some(line))
    }

    /// Write a message to stdout
    pub async fn write_message(&mut self, message: &str) -> io::Result<()> {
        trace!("Sending: {}", message);
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write a JSON-RPC response
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.write_message(&json).await
    }
}

impl Default for AsyncStdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdio_transport_creation() {
        // Just verify we can create the transport
        let _transport = AsyncStdioTransport::new();
    }
}
