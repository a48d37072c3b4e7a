//! Run context shared by the commands
//!
//! Resolves the project root, finds the configuration file and loads the link
//! mapping from it.

use std::path::{Path, PathBuf};

use dk_core::{Config, ConfigLocator, InterpolationContext};
use dk_fs::{EntryKind, Filesystem, PathResolver, RealFs};

use crate::error::{CliError, Result};

/// Everything a command needs to run against the real filesystem
#[derive(Debug)]
pub struct AppContext {
    /// Directory holding the dotfiles
    pub project_root: PathBuf,
    /// Configuration file in use
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Config,
    /// Tilde expansion and canonicalization
    pub paths: PathResolver,
}

impl AppContext {
    /// Resolve the project root and load the configuration.
    ///
    /// # Arguments
    /// - `working_dir`: directory the command runs from
    /// - `project_root`: `--project-root` or `PROJECT_ROOT`, if given
    /// - `config`: `--config`, if given
    pub fn load(
        working_dir: &Path,
        project_root: Option<&Path>,
        config: Option<&Path>,
    ) -> Result<Self> {
        let paths = PathResolver::from_env();
        let project_root = resolve_project_root(&paths, working_dir, project_root)?;
        let config_path = locator(&paths, working_dir, &project_root, config).locate_or_create()?;

        let ctx = InterpolationContext::new().with_project_root(&project_root);
        let config = Config::load(&config_path, &ctx)?;
        tracing::debug!(
            project_root = %project_root.display(),
            config = %config_path.display(),
            links = config.links().len(),
            "context loaded"
        );

        Ok(Self {
            project_root,
            config_path,
            config,
            paths,
        })
    }
}

/// Find the configuration file without loading it, creating the default one
/// when none exists.
pub fn config_path(
    working_dir: &Path,
    project_root: Option<&Path>,
    config: Option<&Path>,
) -> Result<PathBuf> {
    let paths = PathResolver::from_env();
    let project_root = resolve_project_root(&paths, working_dir, project_root)?;
    Ok(locator(&paths, working_dir, &project_root, config).locate_or_create()?)
}

fn locator(
    paths: &PathResolver,
    working_dir: &Path,
    project_root: &Path,
    config: Option<&Path>,
) -> ConfigLocator {
    let explicit = config.map(|path| absolute(working_dir, &paths.expand(path)));
    ConfigLocator::new(project_root, working_dir).with_explicit(explicit)
}

/// The project root as an existing, canonical directory.
fn resolve_project_root(
    paths: &PathResolver,
    working_dir: &Path,
    requested: Option<&Path>,
) -> Result<PathBuf> {
    let candidate = match requested {
        Some(path) => absolute(working_dir, &paths.expand(path)),
        None => working_dir.to_path_buf(),
    };

    let root = paths.resolve(&RealFs, &candidate, true)?;
    if RealFs.entry_kind(&root) != Some(EntryKind::Directory) {
        return Err(CliError::user(format!(
            "Project root {} is not a directory",
            root.display()
        )));
    }
    Ok(root)
}

fn absolute(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
