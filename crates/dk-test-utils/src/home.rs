//! [`TestHome`] fixture for reconciliation scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use dk_core::LinkMapping;
use dk_fs::PathResolver;
use tempfile::TempDir;

/// A temporary home directory with a `dotfiles/` folder inside.
///
/// # Example
///
/// ```rust,no_run
/// use dk_test_utils::TestHome;
///
/// let home = TestHome::new();
/// home.write("dotfiles/.bashrc", "X");
/// let mapping = home.mapping(&[(".bashrc", "dotfiles/.bashrc")]);
/// ```
pub struct TestHome {
    temp_dir: TempDir,
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHome {
    /// Create an empty home with a `dotfiles/` directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("dotfiles")).unwrap();
        Self { temp_dir }
    }

    /// Root of the home directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the home.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Resolver expanding `~` to this home.
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(self.root())
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a directory and its parents.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a symlink at `rel` pointing to `target` (relative to the home).
    #[cfg(unix)]
    pub fn symlink(&self, rel: &str, target: &str) -> PathBuf {
        let path = self.path(rel);
        std::os::unix::fs::symlink(self.path(target), &path).unwrap();
        path
    }

    /// Read a file inside the home.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    /// Whether `rel` is a symlink.
    pub fn is_symlink(&self, rel: &str) -> bool {
        fs::symlink_metadata(self.path(rel))
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Whether anything occupies `rel`, without following symlinks.
    pub fn occupied(&self, rel: &str) -> bool {
        fs::symlink_metadata(self.path(rel)).is_ok()
    }

    /// Build a mapping of absolute paths from home-relative pairs.
    pub fn mapping(&self, pairs: &[(&str, &str)]) -> LinkMapping {
        LinkMapping::from_pairs(pairs.iter().map(|(source, target)| {
            (
                self.path(source).to_string_lossy().to_string(),
                self.path(target).to_string_lossy().to_string(),
            )
        }))
        .unwrap()
    }

    /// Assert that `rel` is a symlink resolving to `target`.
    pub fn assert_links_to(&self, rel: &str, target: &str) {
        assert!(self.is_symlink(rel), "expected {rel} to be a symlink");
        assert_eq!(
            fs::canonicalize(self.path(rel)).unwrap(),
            fs::canonicalize(self.path(target)).unwrap(),
            "{rel} resolves to the wrong place"
        );
    }
}
