//! Link status classification
//!
//! Inspects a single `(source, target)` pair and reports how the source
//! location relates to the symlink that should exist there.

use std::fmt;
use std::path::Path;

use dk_fs::{EntryKind, Filesystem, PathResolver};
use serde::{Deserialize, Serialize};

/// State of a declared link on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    /// Source is a symlink resolving to the target
    Correct,
    /// Nothing exists at the source
    Missing,
    /// Source is a symlink resolving somewhere else
    Incorrect,
    /// Source exists but is not a symlink
    Nonlink,
}

impl LinkStatus {
    /// Whether this status requires the link to be (re)created
    pub fn needs_action(self) -> bool {
        !matches!(self, Self::Correct)
    }

    /// Whether fixing this status overwrites something that exists
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Incorrect | Self::Nonlink)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Missing => "MISSING",
            Self::Incorrect => "INCORRECT",
            Self::Nonlink => "NONLINK",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the declared target exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetValidity {
    Exists,
    Missing,
}

impl TargetValidity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "EXISTS",
            Self::Missing => "MISSING",
        }
    }
}

impl fmt::Display for TargetValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the link at `source` against the declared `target`.
///
/// Existence follows symlinks, so a dangling symlink at `source` is
/// [`LinkStatus::Missing`]. Both sides are compared in canonical form; a
/// target that does not exist compares as its would-be location.
pub fn classify_link(
    fs: &dyn Filesystem,
    paths: &PathResolver,
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
) -> LinkStatus {
    let source = paths.expand(source);
    let target = paths.expand(target);

    if !fs.exists(&source) {
        return LinkStatus::Missing;
    }
    if fs.entry_kind(&source) != Some(EntryKind::Symlink) {
        return LinkStatus::Nonlink;
    }

    let actual = paths.resolve_lenient(fs, &source);
    let expected = paths.resolve_lenient(fs, &target);
    tracing::debug!(
        source = %source.display(),
        actual = %actual.display(),
        expected = %expected.display(),
        "comparing symlink destination"
    );

    if actual == expected {
        LinkStatus::Correct
    } else {
        LinkStatus::Incorrect
    }
}

/// Check whether the declared target exists.
pub fn classify_target(
    fs: &dyn Filesystem,
    paths: &PathResolver,
    target: impl AsRef<Path>,
) -> TargetValidity {
    if fs.exists(&paths.expand(target)) {
        TargetValidity::Exists
    } else {
        TargetValidity::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dk_fs::RealFs;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathResolver) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dotfiles")).unwrap();
        let paths = PathResolver::new(temp.path());
        (temp, paths)
    }

    #[test]
    fn test_missing_source() {
        let (temp, paths) = setup();
        let target = temp.path().join("dotfiles/.bashrc");
        fs::write(&target, "# bashrc").unwrap();

        let status = classify_link(&RealFs, &paths, temp.path().join(".bashrc"), &target);
        assert_eq!(status, LinkStatus::Missing);
    }

    #[test]
    fn test_regular_file_is_nonlink() {
        let (temp, paths) = setup();
        fs::write(temp.path().join(".bashrc"), "local").unwrap();

        let status = classify_link(&RealFs, &paths, "~/.bashrc", "~/dotfiles/.bashrc");
        assert_eq!(status, LinkStatus::Nonlink);
    }

    #[test]
    fn test_directory_is_nonlink() {
        let (temp, paths) = setup();
        fs::create_dir_all(temp.path().join(".config/nvim")).unwrap();

        let status = classify_link(&RealFs, &paths, "~/.config/nvim", "~/dotfiles/nvim");
        assert_eq!(status, LinkStatus::Nonlink);
    }

    #[cfg(unix)]
    #[test]
    fn test_correct_and_incorrect_symlink() {
        let (temp, paths) = setup();
        let target = temp.path().join("dotfiles/.bashrc");
        let wrong = temp.path().join("dotfiles/.vimrc");
        fs::write(&target, "# bashrc").unwrap();
        fs::write(&wrong, "# vimrc").unwrap();
        let source = temp.path().join(".bashrc");

        std::os::unix::fs::symlink(&target, &source).unwrap();
        assert_eq!(
            classify_link(&RealFs, &paths, &source, &target),
            LinkStatus::Correct
        );

        fs::remove_file(&source).unwrap();
        std::os::unix::fs::symlink(&wrong, &source).unwrap();
        assert_eq!(
            classify_link(&RealFs, &paths, &source, &target),
            LinkStatus::Incorrect
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_missing() {
        let (temp, paths) = setup();
        let source = temp.path().join(".bashrc");
        std::os::unix::fs::symlink(temp.path().join("gone"), &source).unwrap();

        assert_eq!(
            classify_link(&RealFs, &paths, &source, temp.path().join("dotfiles/.bashrc")),
            LinkStatus::Missing
        );
    }

    #[test]
    fn test_classify_target() {
        let (temp, paths) = setup();
        let target = temp.path().join("dotfiles/.bashrc");
        assert_eq!(classify_target(&RealFs, &paths, &target), TargetValidity::Missing);

        fs::write(&target, "# content").unwrap();
        assert_eq!(classify_target(&RealFs, &paths, &target), TargetValidity::Exists);
    }

    #[test]
    fn test_status_flags() {
        assert!(!LinkStatus::Correct.needs_action());
        assert!(LinkStatus::Missing.needs_action());
        assert!(!LinkStatus::Missing.is_destructive());
        assert!(LinkStatus::Incorrect.is_destructive());
        assert!(LinkStatus::Nonlink.is_destructive());
    }
}
