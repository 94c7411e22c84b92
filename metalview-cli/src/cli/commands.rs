//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};

/// Bare-metal configuration report CLI
#[derive(Parser, Debug)]
#[command(name = "metalview")]
#[command(
    version,
    about = "Reports network, VLAN, and hardware configuration for the bare-metal servers on an account",
    long_about = None
)]
pub struct Cli {
    /// API endpoint URL (overrides config file)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// API username (overrides config file)
    #[arg(short, long)]
    pub username: Option<String>,

    /// API key (overrides config file)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/metalview/cli.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table output
    Table,
    /// JSON output
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the full configuration report for every server on the account
    Report {
        /// Only report servers in the given datacenter
        #[arg(short, long)]
        datacenter: Option<String>,
    },

    /// List the account's dedicated hardware servers
    List,

    /// Print the configuration report for a single server
    Show {
        /// Hardware id
        id: u64,
    },

    /// Print the installed hardware components of a server
    Components {
        /// Hardware id
        id: u64,
    },

    /// Print the VLANs trunked to a server's private uplink
    Trunks {
        /// Hardware id
        id: u64,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}
