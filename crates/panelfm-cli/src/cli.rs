//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse and edit files behind a control panel's file agent.
#[derive(Debug, Parser)]
#[command(name = "panelfm", version, about)]
pub struct Cli {
    /// Path to a TOML config file (default: $PANELFM_CONFIG, then
    /// ./config/panelfm.toml, then ~/.config/panelfm/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List a directory (default: the root).
    Ls { path: Option<String> },
    /// Print a file.
    Cat { path: String },
    /// Overwrite an existing file with stdin or the contents of --from.
    Write {
        path: String,
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Create an empty file.
    Touch { path: String },
    /// Create an empty folder.
    Mkdir { path: String },
    /// Delete a file, or a folder with everything in it.
    Rm {
        path: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Rename an entry within its folder.
    Mv { path: String, new_name: String },
    /// Interactive shell (the default).
    Shell,
}
