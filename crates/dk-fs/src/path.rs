//! Home-aware path expansion and resolution
//!
//! User-supplied link locations arrive as strings such as `~/.bashrc` or
//! `~alice/.vimrc`. [`PathResolver`] turns them into filesystem paths and,
//! when asked, into canonical paths suitable for equality comparison.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::{Filesystem, Result};

/// Expands home-directory tokens and resolves paths through a [`Filesystem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResolver {
    /// Home directory of the current user, if known
    home: Option<PathBuf>,
}

impl PathResolver {
    /// Create a resolver with an explicit home directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }

    /// Create a resolver using the platform home directory.
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Expand a leading `~` or `~user` token.
    ///
    /// `~user` resolves to a sibling of the current home directory. Paths
    /// without a leading tilde, or when no home directory is known, are
    /// returned unchanged. Never touches the filesystem.
    pub fn expand(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let Some(home) = self.home.as_deref() else {
            return path.to_path_buf();
        };

        let mut components = path.components();
        let Some(Component::Normal(first)) = components.next() else {
            return path.to_path_buf();
        };
        let Some(token) = first.to_str().and_then(|s| s.strip_prefix('~')) else {
            return path.to_path_buf();
        };

        let base = if token.is_empty() {
            home.to_path_buf()
        } else {
            match home.parent() {
                Some(users_root) => users_root.join(token),
                None => return path.to_path_buf(),
            }
        };

        let rest = components.as_path();
        if rest.as_os_str().is_empty() {
            base
        } else {
            base.join(rest)
        }
    }

    /// Expand `path` and, when `follow_links` is set, canonicalize it.
    ///
    /// # Errors
    ///
    /// With `follow_links`, returns [`crate::Error::NotFound`] when a
    /// component of the path does not exist.
    pub fn resolve(
        &self,
        fs: &dyn Filesystem,
        path: impl AsRef<Path>,
        follow_links: bool,
    ) -> Result<PathBuf> {
        let expanded = self.expand(path);
        if follow_links {
            fs.canonicalize(&expanded)
        } else {
            Ok(expanded)
        }
    }

    /// Expand `path`, anchor it at the working directory when relative and
    /// normalize it lexically. Never touches the filesystem.
    ///
    /// Symlinks created from the result point at the same place regardless of
    /// the directory they live in.
    pub fn absolute(&self, path: impl AsRef<Path>) -> PathBuf {
        let expanded = self.expand(path);
        let absolute = std::path::absolute(&expanded).unwrap_or(expanded);
        normalize_lexical(&absolute)
    }

    /// Canonicalize as much of `path` as exists.
    ///
    /// The longest existing ancestor is canonicalized and the remaining
    /// components are appended after lexical normalization, so paths that do
    /// not exist yet still compare equal to their would-be location.
    pub fn resolve_lenient(&self, fs: &dyn Filesystem, path: impl AsRef<Path>) -> PathBuf {
        let normalized = self.absolute(path);

        let mut existing = normalized.as_path();
        let mut tail: Vec<OsString> = Vec::new();
        loop {
            if let Ok(mut resolved) = fs.canonicalize(existing) {
                for name in tail.iter().rev() {
                    resolved.push(name);
                }
                return resolved;
            }
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    existing = parent;
                }
                _ => return normalized,
            }
        }
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_without_tilde_is_identity() {
        let resolver = PathResolver::new("/home/u");
        assert_eq!(resolver.expand("/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(resolver.expand("rel/path"), PathBuf::from("rel/path"));
    }

    #[test]
    fn test_expand_without_home_is_identity() {
        let resolver = PathResolver::default();
        assert_eq!(resolver.expand("~/.bashrc"), PathBuf::from("~/.bashrc"));
    }

    #[test]
    fn test_absolute_anchors_relative_path_at_working_dir() {
        let resolver = PathResolver::new("/home/u");
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolver.absolute("dotfiles/./nvim"), cwd.join("dotfiles/nvim"));
        assert_eq!(resolver.absolute("~/a/../b"), PathBuf::from("/home/u/b"));
    }

    #[test]
    fn test_tilde_in_middle_is_not_expanded() {
        let resolver = PathResolver::new("/home/u");
        assert_eq!(resolver.expand("/tmp/~/x"), PathBuf::from("/tmp/~/x"));
    }
}
