//! CLI module for toolbridge
//!
//! Command-line parsing for the `toolbridge` binary. Uses clap for argument
//! parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// toolbridge - natural-language front end for MCP tool servers
///
/// Lets a language model pick one tool from an MCP server per message,
/// runs it, and explains the result.
#[derive(Parser, Debug)]
#[command(
    name = "toolbridge",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "toolbridge - chat with the tools of an MCP server",
    long_about = "Bridges a conversation to the tools of an MCP server: the language model\n\
                  picks at most one tool per message, toolbridge runs it and the model\n\
                  explains the result.\n\n\
                  Run without arguments to start an interactive chat, or use 'serve' to\n\
                  expose the Tavily search tool as an MCP server (streamable HTTP on\n\
                  127.0.0.1:8080/mcp, or stdio with --stdio).",
    after_help = "EXAMPLES:\n    \
                  toolbridge                              # Interactive chat (reads toolbridge.toml)\n    \
                  toolbridge ask \"recent AI news\"         # Answer a single message\n    \
                  toolbridge tools                        # List the tools the server offers\n    \
                  toolbridge serve                        # Serve the search tool on http://127.0.0.1:8080/mcp\n    \
                  toolbridge serve --stdio                # Serve the search tool over stdio\n    \
                  toolbridge --config my.toml chat        # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./toolbridge.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start an interactive chat session (default)
    ///
    /// Type /clear to reset the conversation and /quit to leave.
    Chat,

    /// Answer a single message and exit
    Ask {
        /// The message to answer
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List the tools offered by the configured MCP server
    Tools,

    /// Serve the Tavily search tool as an MCP server (requires TAVILY_API_KEY)
    Serve {
        /// Speak MCP over stdin/stdout instead of HTTP
        #[arg(long)]
        stdio: bool,

        /// Address for the streamable HTTP endpoint (served at /mcp)
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, with chat as the default
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Chat)
    }
}
