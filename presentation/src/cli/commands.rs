//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results printed by one-shot commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable output
    Pretty,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for refdesk
#[derive(Parser, Debug)]
#[command(name = "refdesk")]
#[command(author, version, about = "Reference lookups behind a cache and circuit breakers")]
#[command(long_about = r#"
refdesk answers lookup requests ("tool invocations") against a built-in
reference catalog and, optionally, a remote docs API.

Every request is sanitized and validated, answered from a TTL cache when
possible, and calls to the remote API go through a circuit breaker.

Configuration files are loaded from (in priority order):
1. REFDESK_* environment variables (e.g. REFDESK_CACHE__DEFAULT_TTL_MS)
2. --config <path>     Explicit config file
3. ./refdesk.toml      Project-level config
4. ~/.config/refdesk/config.toml   Global config

Example:
  refdesk invoke get_entry '{"name": "circuit-breaker"}'
  refdesk tools
  echo '{"name": "list_entries", "params": {}}' | refdesk serve
"#)]
pub struct Cli {
    /// Command to run (may be omitted with --show-config)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,

    /// Also write diagnostics to a daily log file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Invoke one tool and print its result
    Invoke {
        /// Tool name, e.g. get_entry
        name: String,

        /// Parameters as a JSON object
        #[arg(default_value = "{}")]
        params: String,
    },

    /// Serve JSON-lines requests on stdin, one response per line on stdout
    Serve,

    /// List available tools and their parameters
    Tools,

    /// Show configured circuit breaker policies
    ///
    /// Breaker state lives in the serving process, so a one-shot run
    /// reports every breaker as closed. `serve` logs the final states
    /// on shutdown.
    Status,
}
