//! Backup set implementation
//!
//! Handles copying entries aside before they are replaced and putting them
//! back when the user rejects the result.

use std::path::{Path, PathBuf};

use dk_fs::{EntryKind, Filesystem};
use tempfile::TempDir;

use crate::reconcile::{Event, Reporter};
use crate::{Error, Result};

/// Prefix of the temporary backup directory
const BACKUP_DIR_PREFIX: &str = "dotkeeper-backup-";

/// What was stored for a backed up entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredKind {
    /// Regular file with the checksum of its content
    File { checksum: String },
    /// Directory tree
    Directory,
    /// Symlink with its destination as written
    Symlink { link: PathBuf },
}

/// A single backed up entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Key of the stored copy inside the backup root
    pub key: String,
    /// Location the entry was copied from
    pub original: PathBuf,
    /// Location of the stored copy
    pub stored: PathBuf,
    /// Kind of entry stored
    pub kind: StoredKind,
}

/// Result of restoring a backup set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Entries put back at their original location
    pub restored: usize,
    /// Stored items with no matching record
    pub skipped: usize,
}

/// Copies of entries about to be replaced, held in a temporary directory.
///
/// The directory is deleted when the set is dropped.
#[derive(Debug)]
pub struct BackupSet {
    root: TempDir,
    records: Vec<BackupRecord>,
}

impl BackupSet {
    /// Back up every existing entry in `originals`.
    ///
    /// Entries that do not exist are skipped. Each stored copy is keyed by its
    /// position and base name, so originals sharing a base name never collide.
    ///
    /// # Arguments
    /// - `fs`: filesystem to copy through
    /// - `originals`: paths about to be replaced, in processing order
    /// - `parent`: directory to create the backup root in, or the system
    ///   temporary directory when `None`
    /// - `reporter`: receives one [`Event::BackedUp`] per stored entry
    ///
    /// # Errors
    ///
    /// Any copy failure aborts the backup; the partial set is removed.
    pub fn create<'a>(
        fs: &dyn Filesystem,
        originals: impl IntoIterator<Item = &'a Path>,
        parent: Option<&Path>,
        reporter: &mut dyn Reporter,
    ) -> Result<Self> {
        let root = create_root(parent)?;
        let mut set = Self {
            root,
            records: Vec::new(),
        };

        for (index, original) in originals.into_iter().enumerate() {
            let Some(kind) = fs.entry_kind(original) else {
                tracing::debug!(path = %original.display(), "nothing to back up");
                continue;
            };

            let key = backup_key(index, original);
            let stored = set.root.path().join(&key);
            let kind = match kind {
                EntryKind::Directory => {
                    fs.copy_tree(original, &stored)?;
                    StoredKind::Directory
                }
                EntryKind::Symlink => {
                    let link = fs.read_link(original)?;
                    fs.symlink(&stored, &link)?;
                    StoredKind::Symlink { link }
                }
                EntryKind::File => {
                    let checksum = fs.checksum(original)?;
                    fs.copy_file(original, &stored)?;
                    StoredKind::File { checksum }
                }
            };

            reporter.notify(&Event::BackedUp {
                original: original.to_path_buf(),
                stored: stored.clone(),
            });
            set.records.push(BackupRecord {
                key,
                original: original.to_path_buf(),
                stored,
                kind,
            });
        }

        tracing::info!(
            root = %set.root.path().display(),
            count = set.records.len(),
            "backup set created"
        );
        Ok(set)
    }

    /// Directory holding the stored copies
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Records in backup order
    pub fn records(&self) -> &[BackupRecord] {
        &self.records
    }

    /// Record of the entry backed up from `original`
    pub fn record_for(&self, original: &Path) -> Option<&BackupRecord> {
        self.records.iter().find(|r| r.original == original)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Put every stored entry back at its original location.
    ///
    /// Whatever occupies the original path is removed first. Stored items
    /// without a record are reported and skipped. Restored files are verified
    /// against the checksum taken at backup time.
    ///
    /// # Errors
    ///
    /// The first I/O failure stops the restore and is returned.
    pub fn restore(&self, fs: &dyn Filesystem, reporter: &mut dyn Reporter) -> Result<RestoreSummary> {
        let mut summary = RestoreSummary::default();

        for stored in fs.read_dir(self.root.path())? {
            let Some(record) = self.records.iter().find(|r| r.stored == stored) else {
                tracing::warn!(stored = %stored.display(), "no record for backup item");
                reporter.notify(&Event::RestoreSkipped { stored });
                summary.skipped += 1;
                continue;
            };

            restore_record(fs, record)?;
            reporter.notify(&Event::Restored {
                original: record.original.clone(),
            });
            summary.restored += 1;
        }

        Ok(summary)
    }
}

fn create_root(parent: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(BACKUP_DIR_PREFIX);
    let created = match parent {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    };
    created.map_err(|e| {
        let dir = parent.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        Error::Fs(dk_fs::Error::io(dir, e))
    })
}

/// Stable key for the `index`-th backed up entry
fn backup_key(index: usize, original: &Path) -> String {
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "entry".to_string());
    format!("{:03}-{}", index, name)
}

fn restore_record(fs: &dyn Filesystem, record: &BackupRecord) -> Result<()> {
    let original = record.original.as_path();

    match fs.entry_kind(original) {
        Some(EntryKind::Directory) => fs.remove_tree(original)?,
        Some(_) => fs.remove_entry(original)?,
        None => {}
    }

    if let Some(parent) = original.parent()
        && fs.entry_kind(parent).is_none()
    {
        fs.create_dir_all(parent)?;
    }

    match &record.kind {
        StoredKind::Directory => fs.copy_tree(&record.stored, original)?,
        StoredKind::Symlink { link } => fs.symlink(original, link)?,
        StoredKind::File { checksum } => {
            fs.copy_file(&record.stored, original)?;
            if &fs.checksum(original)? != checksum {
                return Err(Error::Integrity {
                    path: original.to_path_buf(),
                });
            }
        }
    }

    tracing::debug!(original = %original.display(), "restored from backup");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ReconciliationPlan;
    use dk_fs::RealFs;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Events(Vec<Event>);

    impl Reporter for Events {
        fn preview(&mut self, _plan: &ReconciliationPlan) {}

        fn notify(&mut self, event: &Event) {
            self.0.push(event.clone());
        }
    }

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let backups = temp.path().join("backups");
        fs::create_dir_all(&backups).unwrap();
        (temp, backups)
    }

    #[test]
    fn test_backup_key_is_positional() {
        assert_eq!(backup_key(0, Path::new("/home/u/.bashrc")), "000-.bashrc");
        assert_eq!(backup_key(12, Path::new("/a/b/nvim")), "012-nvim");
    }

    #[test]
    fn test_create_backs_up_file() {
        let (temp, backups) = setup();
        let source = temp.path().join(".bashrc");
        fs::write(&source, "original content").unwrap();
        let mut events = Events::default();

        let set = BackupSet::create(&RealFs, [source.as_path()], Some(&backups), &mut events)
            .unwrap();

        assert_eq!(set.len(), 1);
        let record = &set.records()[0];
        assert_eq!(record.original, source);
        assert_eq!(fs::read_to_string(&record.stored).unwrap(), "original content");
        assert!(matches!(record.kind, StoredKind::File { .. }));
        assert_eq!(set.record_for(&source), Some(record));
        assert_eq!(set.record_for(&temp.path().join(".zshrc")), None);
        assert_eq!(events.0.len(), 1);
    }

    #[test]
    fn test_create_skips_missing_entries() {
        let (temp, backups) = setup();
        let mut events = Events::default();

        let set = BackupSet::create(
            &RealFs,
            [temp.path().join("absent").as_path()],
            Some(&backups),
            &mut events,
        )
        .unwrap();

        assert!(set.is_empty());
        assert!(events.0.is_empty());
    }

    #[test]
    fn test_same_base_name_does_not_collide() {
        let (temp, backups) = setup();
        let first = temp.path().join("a/config");
        let second = temp.path().join("b/config");
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        fs::write(&first, "first").unwrap();
        fs::write(&second, "second").unwrap();

        let set = BackupSet::create(
            &RealFs,
            [first.as_path(), second.as_path()],
            Some(&backups),
            &mut Events::default(),
        )
        .unwrap();

        fs::write(&first, "changed").unwrap();
        fs::write(&second, "changed").unwrap();
        set.restore(&RealFs, &mut Events::default()).unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), "first");
        assert_eq!(fs::read_to_string(&second).unwrap(), "second");
    }

    #[test]
    fn test_restore_directory_replaces_current_entry() {
        let (temp, backups) = setup();
        let source = temp.path().join("nvim");
        fs::create_dir_all(source.join("lua")).unwrap();
        fs::write(source.join("lua/init.lua"), "-- config").unwrap();

        let set = BackupSet::create(&RealFs, [source.as_path()], Some(&backups), &mut Events::default())
            .unwrap();

        fs::remove_dir_all(&source).unwrap();
        fs::write(&source, "now a file").unwrap();

        let summary = set.restore(&RealFs, &mut Events::default()).unwrap();

        assert_eq!(summary, RestoreSummary { restored: 1, skipped: 0 });
        assert_eq!(
            fs::read_to_string(source.join("lua/init.lua")).unwrap(),
            "-- config"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_backed_up_as_symlink() {
        let (temp, backups) = setup();
        let source = temp.path().join(".vimrc");
        let elsewhere = temp.path().join("elsewhere");
        fs::write(&elsewhere, "x").unwrap();
        std::os::unix::fs::symlink(&elsewhere, &source).unwrap();

        let set = BackupSet::create(&RealFs, [source.as_path()], Some(&backups), &mut Events::default())
            .unwrap();
        fs::remove_file(&source).unwrap();
        set.restore(&RealFs, &mut Events::default()).unwrap();

        assert!(RealFs.is_symlink(&source));
        assert_eq!(fs::read_link(&source).unwrap(), elsewhere);
    }

    #[test]
    fn test_stray_item_is_skipped() {
        let (temp, backups) = setup();
        let source = temp.path().join(".bashrc");
        fs::write(&source, "original").unwrap();
        let set = BackupSet::create(&RealFs, [source.as_path()], Some(&backups), &mut Events::default())
            .unwrap();
        fs::write(set.root().join("stray"), "?").unwrap();
        let mut events = Events::default();

        let summary = set.restore(&RealFs, &mut events).unwrap();

        assert_eq!(summary, RestoreSummary { restored: 1, skipped: 1 });
        assert!(events
            .0
            .iter()
            .any(|e| matches!(e, Event::RestoreSkipped { .. })));
    }

    #[test]
    fn test_root_removed_on_drop() {
        let (temp, backups) = setup();
        let source = temp.path().join(".bashrc");
        fs::write(&source, "original").unwrap();

        let set = BackupSet::create(&RealFs, [source.as_path()], Some(&backups), &mut Events::default())
            .unwrap();
        let root = set.root().to_path_buf();
        assert!(root.exists());

        drop(set);
        assert!(!root.exists());
    }
}
