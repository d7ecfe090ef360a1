//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for toolgate
#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(author, version, about = "Turn model output into sandboxed, validated tool calls")]
#[command(long_about = r#"
toolgate sends your message to a local model, looks for a JSON tool call
in the reply and, if it finds one, runs it against a fixed set of sandboxed
tools (bounded file reads, glob search, time-limited Python snippets).

Configuration files are loaded from (in priority order):
1. TOOLGATE_<SECTION>__<KEY>                Environment
2. --config <path>                          Explicit config file
3. ./toolgate.toml                          Project-level config
4. ~/.config/toolgate/config.toml           Global config

Example:
  toolgate ask "What files are in /data/reports?"
  toolgate --root ./data chat
  toolgate call add_numbers --args '{"a": 2, "b": 3}'
  echo '{"tool": "get_current_time", "parameters": {}}' | toolgate extract --dispatch
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration
    #[arg(long, global = true)]
    pub show_config: bool,

    /// Allowed root directory (can be specified multiple times; replaces configured roots)
    #[arg(long = "root", value_name = "DIR", global = true)]
    pub roots: Vec<PathBuf>,

    /// Model name
    #[arg(short, long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Base URL of the Ollama server
    #[arg(long, value_name = "URL", global = true)]
    pub backend_url: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one turn and print the reply
    Ask {
        /// The message to send to the model
        message: String,
    },

    /// Interactive loop over stdin (Ctrl-C cancels the current turn, /quit exits)
    Chat,

    /// Print tool declarations as JSON Schema
    Tools,

    /// Dispatch a tool call directly, without the model
    Call {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        args: String,
    },

    /// Read model text from stdin and show the extracted tool call
    Extract {
        /// Also dispatch the extracted call
        #[arg(long)]
        dispatch: bool,
    },
}
