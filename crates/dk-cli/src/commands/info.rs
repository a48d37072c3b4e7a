//! Informational commands

use std::path::Path;

use crate::context;
use crate::error::Result;

/// Application name
pub const APP_NAME: &str = "DotKeeper";

/// Application author
pub const APP_AUTHOR: &str = "Alchemyst0x";

pub fn run_version() -> Result<()> {
    println!("{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

pub fn run_app_name() -> Result<()> {
    println!("{}", APP_NAME);
    Ok(())
}

pub fn run_app_author() -> Result<()> {
    println!("{}", APP_AUTHOR);
    Ok(())
}

/// Print the configuration file in use, creating the default one if needed.
pub fn run_config_path(
    working_dir: &Path,
    project_root: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let path = context::config_path(working_dir, project_root, config)?;
    println!("{}", path.display());
    Ok(())
}
