//! Run notifications and outcome

use std::path::PathBuf;

use crate::plan::ReconciliationPlan;
use crate::reconcile::Gate;

/// Something observable that happened during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Every link is already correct
    NoChangesNeeded,
    /// Links requiring action point at targets that do not exist
    MissingTargets(Vec<PathBuf>),
    /// The user refused at a gate; nothing was changed
    Aborted(Gate),
    /// An entry was copied into the backup set
    BackedUp { original: PathBuf, stored: PathBuf },
    /// An entry occupying a source path was removed
    Removed { path: PathBuf, directory: bool },
    /// A symlink was created
    Created { source: PathBuf, target: PathBuf },
    /// Replacing the entry at `source` failed; `lost` when the original was
    /// already removed and survives only in the backup set
    ApplyFailed { source: PathBuf, lost: bool },
    /// Restore from backup is starting
    Restoring,
    /// An entry was restored from the backup set
    Restored { original: PathBuf },
    /// A backup item had no record of its original location
    RestoreSkipped { stored: PathBuf },
    /// Restore from backup finished
    RestoreCompleted,
}

/// Receives the preview and every notification of a run
pub trait Reporter {
    /// Render the classified plan
    fn preview(&mut self, plan: &ReconciliationPlan);

    /// Report a single event
    fn notify(&mut self, event: &Event);
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every link was already correct
    AlreadyCorrect,
    /// Only the preview was requested
    Previewed { pending: usize },
    /// Refused at a gate before anything changed
    Aborted(Gate),
    /// Changes applied and kept
    Applied { changed: usize },
    /// Changes applied, then rolled back: `removed` entries created by the
    /// run were deleted and `restored` entries put back from the backup set
    Restored {
        restored: usize,
        skipped: usize,
        removed: usize,
    },
}
