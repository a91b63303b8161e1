//! Command-line interface

use clap::{Parser, Subcommand};

/// Reddit MCP Server - read-only Reddit access over stdio
#[derive(Parser, Debug)]
#[command(name = "reddit-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "info",
        env = "REDDIT_MCP_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "REDDIT_MCP_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve MCP over stdio (default)
    Serve,

    /// Print the tool definitions as JSON and exit
    Tools,
}
