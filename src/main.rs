//! Reddit MCP Server
//!
//! Exposes read-only Reddit access as MCP tools over stdio.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use reddit_mcp::{
    cli::{Cli, Command},
    config::Config,
    reddit::RedditClient,
    server::Server,
    setup_tracing, tools,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Some(Command::Tools) => print_tools(),
        Some(Command::Serve) | None => run_server().await,
    }
}

/// Print the tool definitions as JSON
fn print_tools() -> ExitCode {
    match serde_json::to_string_pretty(&tools::definitions()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize tool definitions: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load config and serve stdio until stdin closes
async fn run_server() -> ExitCode {
    // Credentials are required up front; serving without them would turn
    // every tool call into an auth failure.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match RedditClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Reddit client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match Server::new(client).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}
