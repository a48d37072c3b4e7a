//! Backup and restore of entries replaced by a reconciliation run
//!
//! Before an existing entry at a source path is replaced by a symlink, it is
//! copied into a [`BackupSet`] living in a temporary directory. If the user
//! rejects the result, the set puts every entry back. The directory is removed
//! when the set is dropped, whichever way the run ends.

mod backup_set;

pub use backup_set::{BackupRecord, BackupSet, RestoreSummary, StoredKind};
