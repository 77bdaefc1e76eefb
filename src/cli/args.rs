//! Command line arguments for the `rulekit` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Wire JSON, one document per reply
    #[default]
    Json,
    /// Human-readable tables
    Text,
}

#[derive(Debug, Parser)]
#[command(
    name = "rulekit",
    version,
    about = "Serve lint and breaking change rules over JSON wire messages"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Reply format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, env = "RULEKIT_FORMAT", global = true)]
    pub format: OutputFormat,

    /// JSON engine config file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Concurrent rule handlers per check; zero or less means one per CPU
    #[arg(long, allow_negative_numbers = true, global = true)]
    pub parallelism: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a check request read from stdin or --input
    Check {
        /// Read the request from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },
    /// List one page of rules
    ListRules(PageArgs),
    /// List one page of categories
    ListCategories(PageArgs),
    /// Print plugin information
    Info,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct PageArgs {
    /// Items per page; zero or less means the default of 250
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub page_size: i32,

    /// Token returned by the previous page
    #[arg(long, default_value = "")]
    pub page_token: String,

    /// Follow next-page tokens until every item is listed
    #[arg(long)]
    pub all: bool,
}
