//! DotKeeper CLI
//!
//! Keeps the symlinks declared in a configuration file pointing at the right
//! dotfiles.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;
mod render;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    // Variables from a local .env file never override the environment
    let _ = dotenvy::dotenv();

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command.clone() {
        Some(cmd) => execute_command(&cli, cmd),
        None => {
            // No command provided - show help hint
            println!("{} {}", "dk".green().bold(), commands::APP_NAME);
            println!();
            println!("Run {} for available commands.", "dk --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cli: &Cli, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Apply { yes } => {
            let context = load_context(cli)?;
            commands::run_apply(&context, yes).map(|_| ())
        }
        Commands::Status { json } => {
            let context = load_context(cli)?;
            commands::run_status(&context, json)
        }
        Commands::ConfigPath => {
            let cwd = std::env::current_dir()?;
            commands::run_config_path(&cwd, cli.project_root.as_deref(), cli.config.as_deref())
        }
        Commands::Version => commands::run_version(),
        Commands::AppName => commands::run_app_name(),
        Commands::AppAuthor => commands::run_app_author(),
    }
}

fn load_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir()?;
    AppContext::load(&cwd, cli.project_root.as_deref(), cli.config.as_deref())
}
