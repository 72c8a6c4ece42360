//! Command-line definitions.

use clap::{Parser, Subcommand};
use vantage_api::ConfigArgs;

/// Vantage administration tool
#[derive(Parser, Debug)]
#[command(name = "vantage", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file and overrides
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the demo accounts and overwrite their profile documents
    Seed,
    /// Configuration inspection
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the resolved configuration as TOML
    Show,
}
