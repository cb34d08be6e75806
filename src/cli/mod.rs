//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;
use std::path::PathBuf;

pub mod completions;
pub mod decode;
pub mod profiles;
pub mod scan;

/// Output format options
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting
    #[default]
    Pretty,
    /// JSON format - structured for scripts
    Json,
}

/// storaudit - audit browser localStorage token exposure on your own machine
#[derive(Parser, Debug)]
#[command(name = "storaudit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, json)
    #[arg(
        long,
        global = true,
        env = "STORAUDIT_FORMAT",
        default_value = "pretty",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "STORAUDIT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "STORAUDIT_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan browser profiles for tokens stored in localStorage
    #[command(after_help = "EXAMPLES:\n  \
        storaudit scan                       # Interactive scan with confirmation\n  \
        storaudit scan --yes                 # Skip the confirmation prompt\n  \
        storaudit scan --token-name my-jwt   # Search for a different token name\n  \
        storaudit scan --format json -y      # Machine-readable report")]
    Scan(ScanArgs),

    /// Decode and analyze a JWT (no signature verification)
    #[command(after_help = "EXAMPLES:\n  \
        storaudit decode eyJhbGci...         # Decode a token\n  \
        storaudit decode eyJhbGci... --format json")]
    Decode {
        /// JWT token to decode
        token: String,
    },

    /// List detected browser profiles without scanning them
    Profiles,

    /// Display version information
    Version,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the scan command
#[derive(Debug, clap::Args)]
pub struct ScanArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Token name to search for (overrides config)
    #[arg(long)]
    pub token_name: Option<String>,

    /// Result file path (overrides config)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Mounted Windows user tree to also scan (e.g. /mnt/c/Users)
    #[arg(long)]
    pub windows_root: Option<PathBuf>,
}
