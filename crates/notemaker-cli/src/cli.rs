use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use notemaker_core::SyncMode;

#[derive(Debug, Parser)]
#[command(name = "notemaker")]
#[command(about = "Keep a shared list of short notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a JSON config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How list changes are confirmed; overrides the configured mode
    #[arg(long, global = true, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List notes, newest first
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note text (read from stdin when omitted)
        text: Vec<String>,
    },
    /// Replace the text of an existing note
    Edit {
        /// Note ID
        id: String,
        /// New note text (read from stdin when omitted)
        text: Vec<String>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: String,
    },
    /// Follow live changes pushed by the backend
    Watch,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    Direct,
    Subscription,
}

impl From<ModeArg> for SyncMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Direct => Self::Direct,
            ModeArg::Subscription => Self::Subscription,
        }
    }
}
