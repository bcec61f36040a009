use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "platform-utils")]
#[command(about = "Whiteboard reconciliation, rate limiting and submission policy tools")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Merge a remote element snapshot into a local one
    Merge {
        #[arg(long)]
        local: PathBuf,
        #[arg(long)]
        remote: PathBuf,
    },
    /// Diff two element snapshots into inserts, updates and deletes
    Diff {
        #[arg(long)]
        previous: PathBuf,
        #[arg(long)]
        current: PathBuf,
    },
    /// Validate a configuration file and print its limits
    CheckConfig {
        #[arg(long)]
        config: PathBuf,
    },
    /// Decide whether a user may submit, against a JSON store fixture
    CheckSubmission {
        #[arg(long)]
        fixture: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        problem: String,
        #[arg(long)]
        session: Option<String>,
        #[arg(long, help = "Configuration file for the attempt quota")]
        config: Option<PathBuf>,
        #[arg(long, help = "Evaluate at this RFC 3339 time instead of now")]
        at: Option<DateTime<Utc>>,
    },
}
