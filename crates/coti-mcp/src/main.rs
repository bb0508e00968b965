//! COTI MCP Server binary
//!
//! Loads account configuration from the environment, wires a wallet
//! client into the tool context, and serves MCP over stdio.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use coti_core::client::MockWalletClient;
use coti_core::config::{Config, ENV_AES_KEY, ENV_PRIVATE_KEY, ENV_PUBLIC_KEY};
use coti_core::network::NetworkSelector;

use coti_mcp::{McpServer, ToolContext};

/// COTI MCP Server - account and privacy operations for AI agents
#[derive(Parser, Debug)]
#[command(name = "coti-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transport mechanism to use
    #[arg(short, long, value_enum, default_value = "stdio")]
    transport: Transport,

    /// Use the deterministic mock wallet client (no node access)
    #[arg(long)]
    mock: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Standard input/output (for Claude Desktop, VS Code, etc.)
    Stdio,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Logging goes to stderr; stdout is reserved for the MCP protocol.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("COTI MCP Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Set {}, {} and {} (comma-separated, positionally aligned).",
                ENV_PUBLIC_KEY, ENV_PRIVATE_KEY, ENV_AES_KEY
            );
            std::process::exit(1);
        }
    };

    let store = config.build_store();
    info!(
        accounts = store.len(),
        network = %config.network,
        "Configuration loaded"
    );

    let tool_context = if args.mock {
        info!("Using mock wallet client");
        ToolContext::new(
            store,
            NetworkSelector::new(config.network),
            Arc::new(MockWalletClient::new()),
        )
    } else {
        // The node-backed client ships with the chain integration and is
        // wired in by that build; this binary carries only the mock.
        eprintln!("No wallet client backend is linked into this build.");
        eprintln!("Run with --mock to use the deterministic mock client.");
        std::process::exit(1);
    };

    let server = McpServer::new(tool_context);

    match args.transport {
        Transport::Stdio => {
            info!("Starting stdio transport");
            server.run_stdio().await?;
        }
    }

    Ok(())
}
