//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// DotKeeper - Keep your dotfile symlinks where they belong
#[derive(Parser, Debug)]
#[command(name = "dk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of searching for one
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the dotfiles, exposed to the config as PROJECT_ROOT
    #[arg(long, global = true, env = "PROJECT_ROOT", value_name = "PATH")]
    pub project_root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create, repair or replace the configured symlinks
    ///
    /// Shows the current state of every link, asks for confirmation, backs up
    /// whatever gets replaced and offers to restore it afterwards.
    Apply {
        /// Answer yes to every question
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the state of every configured link without changing anything
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the path of the configuration file in use
    ConfigPath,

    /// Print the version
    Version,

    /// Print the application name
    AppName,

    /// Print the application author
    AppAuthor,
}
