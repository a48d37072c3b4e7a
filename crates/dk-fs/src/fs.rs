//! Filesystem contract consumed by the reconciliation engine
//!
//! Every existence check, symlink inspection and mutation goes through the
//! [`Filesystem`] trait so that tests can substitute their own implementation.
//! [`RealFs`] talks to the operating system.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result, checksum};

/// Kind of a filesystem entry as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or any other non-directory, non-symlink entry)
    File,
    /// Real directory
    Directory,
    /// Symbolic link, whether or not its destination exists
    Symlink,
}

/// Operations the reconciliation engine needs from a filesystem.
pub trait Filesystem {
    /// Whether `path` exists, following symlinks.
    ///
    /// A dangling symlink does not exist.
    fn exists(&self, path: &Path) -> bool;

    /// Kind of the entry at `path` without following a final symlink,
    /// or `None` if nothing occupies the path.
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Read the destination of the symlink at `path`.
    fn read_link(&self, path: &Path) -> Result<PathBuf>;

    /// Canonicalize `path`, following every symlink.
    ///
    /// Fails with [`Error::NotFound`] if any component is missing.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Create a symlink at `link` pointing to `target`.
    fn symlink(&self, link: &Path, target: &Path) -> Result<()>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy a single file, preserving permissions and access/modification times.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a directory tree. Nested symlinks are copied as symlinks.
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()>;

    /// Remove a single entry (file or symlink).
    fn remove_entry(&self, path: &Path) -> Result<()>;

    /// Remove a real directory and everything below it.
    fn remove_tree(&self, path: &Path) -> Result<()>;

    /// List the entries directly inside `path`, sorted by name.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// SHA-256 checksum of a file's contents.
    fn checksum(&self, path: &Path) -> Result<String>;

    /// Whether the entry at `path` is a symlink.
    fn is_symlink(&self, path: &Path) -> bool {
        self.entry_kind(path) == Some(EntryKind::Symlink)
    }
}

/// The operating system filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let meta = fs::symlink_metadata(path).ok()?;
        let file_type = meta.file_type();
        Some(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).map_err(|e| Error::from_io(path, e))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        dunce::canonicalize(path).map_err(|e| Error::from_io(path, e))
    }

    fn symlink(&self, link: &Path, target: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link).map_err(|e| Error::io(link, e))?;
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link).map_err(|e| Error::io(link, e))?;
            } else {
                std::os::windows::fs::symlink_file(target, link)
                    .map_err(|e| Error::io(link, e))?;
            }
        }

        tracing::debug!(link = %link.display(), target = %target.display(), "created symlink");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| Error::io(path, e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        // Taken before the copy, which may bump the access time
        let meta = fs::metadata(from).map_err(|e| Error::io(from, e))?;
        fs::copy(from, to).map_err(|e| Error::io(from, e))?;

        let times = FileTimes::new()
            .set_modified(meta.modified().map_err(|e| Error::io(from, e))?)
            .set_accessed(meta.accessed().map_err(|e| Error::io(from, e))?);
        // Read-only copies are opened read-only; owning the file is enough
        #[cfg(unix)]
        let dest = File::open(to);
        #[cfg(not(unix))]
        let dest = File::options().write(true).open(to);
        dest
            .and_then(|file| file.set_times(times))
            .map_err(|e| Error::io(to, e))
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                Error::io(path, source)
            })?;

            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| Error::io(entry.path(), std::io::Error::other(e)))?;
            let dest = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                let link = self.read_link(entry.path())?;
                self.symlink(&dest, &link)?;
            } else if file_type.is_dir() {
                self.create_dir_all(&dest)?;
            } else {
                self.copy_file(entry.path(), &dest)?;
            }
        }
        Ok(())
    }

    fn remove_entry(&self, path: &Path) -> Result<()> {
        #[cfg(windows)]
        {
            // Directory symlinks must be removed with remove_dir on Windows
            if path.is_dir() && self.is_symlink(path) {
                return fs::remove_dir(path).map_err(|e| Error::io(path, e));
            }
        }

        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| Error::from_io(path, e))? {
            let entry = entry.map_err(|e| Error::io(path, e))?;
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    fn checksum(&self, path: &Path) -> Result<String> {
        checksum::compute_file_checksum(path).map_err(|e| Error::from_io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_kind_absent() {
        let temp = TempDir::new().unwrap();
        assert_eq!(RealFs.entry_kind(&temp.path().join("nope")), None);
    }

    #[test]
    fn test_entry_kind_file_and_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();

        assert_eq!(RealFs.entry_kind(&file), Some(EntryKind::File));
        assert_eq!(RealFs.entry_kind(temp.path()), Some(EntryKind::Directory));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_symlink_but_does_not_exist() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("link");
        RealFs.symlink(&link, &temp.path().join("gone")).unwrap();

        assert!(RealFs.is_symlink(&link));
        assert!(!RealFs.exists(&link));
    }

    #[test]
    fn test_canonicalize_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = RealFs.canonicalize(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
