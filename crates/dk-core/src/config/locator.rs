//! Configuration file discovery
//!
//! Looks for the configuration file in order of precedence:
//! 1. An explicitly requested path
//! 2. The `DOTKEEPER_CONFIG` environment variable
//! 3. Well-known names in the project root
//! 4. Well-known names in the working directory
//! 5. The XDG location `~/.config/dotkeeper/config.yml`
//! 6. The platform configuration directory
//!
//! When nothing is found a default configuration is written to the platform
//! configuration directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::Config;
use crate::{Error, Result};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "DOTKEEPER_CONFIG";

/// Directory name used under the user configuration directories
pub const APP_DIR_NAME: &str = "dotkeeper";

/// File name of the configuration inside configuration directories
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Candidate names in the project root, in order
pub const PROJECT_CONFIG_NAMES: &[&str] = &[
    "config.yml",
    "config.yaml",
    "dotkeeper.yml",
    "dotkeeper.yaml",
    "dotkeeper_config.yml",
    "dotkeeper_config.yaml",
];

/// Candidate names in the working directory, in order
pub const WORKING_DIR_CONFIG_NAMES: &[&str] = &["config.yml", "dotkeeper.yml", ".dotkeeper.yml"];

/// Finds (or creates) the configuration file
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    /// Project root holding the dotfiles
    project_root: PathBuf,
    /// Directory the command was run from
    working_dir: PathBuf,
    /// Path requested on the command line
    explicit: Option<PathBuf>,
    /// Path from `DOTKEEPER_CONFIG`
    env_override: Option<PathBuf>,
    /// Home directory for the XDG location
    home_dir: Option<PathBuf>,
    /// Platform configuration directory
    config_dir: Option<PathBuf>,
}

impl ConfigLocator {
    /// Create a locator reading `DOTKEEPER_CONFIG` and the platform
    /// directories from the environment.
    pub fn new(project_root: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            working_dir: working_dir.into(),
            explicit: None,
            env_override: std::env::var_os(CONFIG_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            home_dir: dirs::home_dir(),
            config_dir: dirs::config_dir(),
        }
    }

    /// Use `path` before any other source
    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// Replace the value read from `DOTKEEPER_CONFIG`
    pub fn with_env_override(mut self, path: Option<PathBuf>) -> Self {
        self.env_override = path;
        self
    }

    /// Replace the home directory used for the XDG location
    pub fn with_home_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.home_dir = dir;
        self
    }

    /// Replace the platform configuration directory
    pub fn with_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir = dir;
        self
    }

    /// Project root passed to interpolation as `PROJECT_ROOT`
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Location of the default configuration file
    pub fn default_path(&self) -> Option<PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Searched locations after the explicit and environment overrides
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| self.project_root.join(name))
            .collect();
        candidates.extend(
            WORKING_DIR_CONFIG_NAMES
                .iter()
                .map(|name| self.working_dir.join(name)),
        );
        if let Some(home) = &self.home_dir {
            candidates.push(home.join(".config").join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        candidates.extend(self.default_path());
        candidates
    }

    /// Find an existing configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when an explicit or environment
    /// override names a file that does not exist.
    pub fn locate(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = self.explicit.as_ref().or(self.env_override.as_ref()) {
            if !path.is_file() {
                return Err(Error::ConfigNotFound { path: path.clone() });
            }
            return Ok(Some(path.clone()));
        }

        let found = self.candidates().into_iter().find(|path| path.is_file());
        if let Some(path) = &found {
            tracing::debug!(path = %path.display(), "found configuration");
        }
        Ok(found)
    }

    /// Find an existing configuration file, writing the default one if none
    /// exists.
    pub fn locate_or_create(&self) -> Result<PathBuf> {
        match self.locate()? {
            Some(path) => Ok(path),
            None => self.ensure_default(),
        }
    }

    /// Write the default configuration unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConfigDir`] when the platform has no configuration
    /// directory.
    pub fn ensure_default(&self) -> Result<PathBuf> {
        let path = self.default_path().ok_or(Error::NoConfigDir)?;
        if path.exists() {
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| dk_fs::Error::io(parent, e))?;
        }
        let content = serde_yaml::to_string(&Config::default_document())?;
        fs::write(&path, content).map_err(|e| dk_fs::Error::io(&path, e))?;

        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(path)
    }
}
