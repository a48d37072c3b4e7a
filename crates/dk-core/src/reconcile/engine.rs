//! Reconciler implementation
//!
//! A run moves through explicit phases:
//!
//! ```text
//! Classifying -> Previewing -> ConfirmingTargets -> ConfirmingApply
//!     -> Applying -> ConfirmingRestore -> Restoring -> Done
//! ```
//!
//! Previewing ends the run when nothing needs fixing. A "no" at either of the
//! first two gates ends it before anything is touched. The backup set lives
//! from Applying until the run ends and is removed on every exit path.
//!
//! Entries that did not exist before Applying (new links and the parent
//! directories created for them) are recorded in a journal, so a rejected
//! result also takes them away again.

use std::path::{Path, PathBuf};

use dk_fs::{EntryKind, Filesystem, PathResolver};

use super::{Confirmer, Event, Gate, ReconcileOutcome, Reporter};
use crate::Result;
use crate::backup::BackupSet;
use crate::mapping::LinkMapping;
use crate::plan::{PlannedLink, ReconciliationPlan};

/// Options for a reconciliation run
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Stop after the preview without asking or changing anything
    pub preview_only: bool,
    /// Directory to create the backup set in instead of the system temp dir
    pub backup_dir: Option<PathBuf>,
}

enum Phase {
    Classifying,
    Previewing(ReconciliationPlan),
    ConfirmingTargets(ReconciliationPlan),
    ConfirmingApply(ReconciliationPlan),
    Applying(ReconciliationPlan),
    ConfirmingRestore {
        backup: BackupSet,
        journal: Journal,
        changed: usize,
    },
    Restoring { backup: BackupSet, journal: Journal },
    Done(ReconcileOutcome),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Self::Classifying => "classifying",
            Self::Previewing(_) => "previewing",
            Self::ConfirmingTargets(_) => "confirming-targets",
            Self::ConfirmingApply(_) => "confirming-apply",
            Self::Applying(_) => "applying",
            Self::ConfirmingRestore { .. } => "confirming-restore",
            Self::Restoring { .. } => "restoring",
            Self::Done(_) => "done",
        }
    }
}

/// Entries created during Applying where nothing usable existed
#[derive(Debug, Default)]
struct Journal {
    /// New symlinks, with the destination of the dangling link they replaced
    links: Vec<(PathBuf, Option<PathBuf>)>,
    /// Outermost directories created for link parents, in creation order
    dirs: Vec<PathBuf>,
}

/// Drives a single reconciliation run
///
/// All filesystem access goes through the [`Filesystem`], every question
/// through the [`Confirmer`] and every notification through the [`Reporter`].
pub struct Reconciler<'a> {
    fs: &'a dyn Filesystem,
    paths: &'a PathResolver,
    confirmer: &'a mut dyn Confirmer,
    reporter: &'a mut dyn Reporter,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler with default options
    pub fn new(
        fs: &'a dyn Filesystem,
        paths: &'a PathResolver,
        confirmer: &'a mut dyn Confirmer,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            fs,
            paths,
            confirmer,
            reporter,
            options: ReconcileOptions::default(),
        }
    }

    /// Replace the run options
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Reconcile `mapping` against the filesystem.
    ///
    /// # Errors
    ///
    /// Returns the first I/O failure while backing up, applying or restoring;
    /// the remaining steps of that phase are not attempted. A refusal at a
    /// gate is an [`ReconcileOutcome::Aborted`] outcome, not an error.
    pub fn run(&mut self, mapping: &LinkMapping) -> Result<ReconcileOutcome> {
        let mut phase = Phase::Classifying;
        loop {
            tracing::debug!(phase = phase.name(), "entering phase");
            phase = match phase {
                Phase::Classifying => {
                    Phase::Previewing(ReconciliationPlan::classify(self.fs, self.paths, mapping))
                }
                Phase::Previewing(plan) => self.preview(plan),
                Phase::ConfirmingTargets(plan) => self.confirm_targets(plan)?,
                Phase::ConfirmingApply(plan) => {
                    if self.ask(Gate::ApplyChanges)? {
                        Phase::Applying(plan)
                    } else {
                        self.abort(Gate::ApplyChanges)
                    }
                }
                Phase::Applying(plan) => self.apply(&plan)?,
                Phase::ConfirmingRestore {
                    backup,
                    journal,
                    changed,
                } => {
                    if self.ask(Gate::KeepChanges)? {
                        Phase::Done(ReconcileOutcome::Applied { changed })
                    } else {
                        Phase::Restoring { backup, journal }
                    }
                }
                Phase::Restoring { backup, journal } => {
                    self.reporter.notify(&Event::Restoring);
                    let removed = self.undo_created(&journal)?;
                    let summary = backup.restore(self.fs, self.reporter)?;
                    self.reporter.notify(&Event::RestoreCompleted);
                    Phase::Done(ReconcileOutcome::Restored {
                        restored: summary.restored,
                        skipped: summary.skipped,
                        removed,
                    })
                }
                Phase::Done(outcome) => {
                    tracing::info!(?outcome, "reconciliation finished");
                    return Ok(outcome);
                }
            };
        }
    }

    fn preview(&mut self, plan: ReconciliationPlan) -> Phase {
        self.reporter.preview(&plan);

        if plan.is_noop() {
            self.reporter.notify(&Event::NoChangesNeeded);
            return Phase::Done(ReconcileOutcome::AlreadyCorrect);
        }
        if self.options.preview_only {
            return Phase::Done(ReconcileOutcome::Previewed {
                pending: plan.pending_count(),
            });
        }
        Phase::ConfirmingTargets(plan)
    }

    fn confirm_targets(&mut self, plan: ReconciliationPlan) -> Result<Phase> {
        let missing = plan.missing_targets();
        if missing.is_empty() {
            return Ok(Phase::ConfirmingApply(plan));
        }

        self.reporter.notify(&Event::MissingTargets(missing));
        if self.ask(Gate::ContinueWithMissingTargets)? {
            Ok(Phase::ConfirmingApply(plan))
        } else {
            Ok(self.abort(Gate::ContinueWithMissingTargets))
        }
    }

    fn ask(&mut self, gate: Gate) -> Result<bool> {
        let answer = self.confirmer.confirm(gate)?;
        tracing::debug!(?gate, answer, "gate answered");
        Ok(answer)
    }

    fn abort(&mut self, gate: Gate) -> Phase {
        self.reporter.notify(&Event::Aborted(gate));
        Phase::Done(ReconcileOutcome::Aborted(gate))
    }

    fn apply(&mut self, plan: &ReconciliationPlan) -> Result<Phase> {
        let backup = BackupSet::create(
            self.fs,
            plan.destructive().map(|link| link.source.as_path()),
            self.options.backup_dir.as_deref(),
            self.reporter,
        )?;

        let mut journal = Journal::default();
        let mut changed = 0;
        for link in plan.pending() {
            if let Err(e) = self.replace_with_symlink(link, &mut journal) {
                self.report_failure(link, &backup);
                return Err(e);
            }
            changed += 1;
        }

        Ok(Phase::ConfirmingRestore {
            backup,
            journal,
            changed,
        })
    }

    fn replace_with_symlink(&mut self, link: &PlannedLink, journal: &mut Journal) -> Result<()> {
        let source = link.source.as_path();
        let existing = self.fs.entry_kind(source);

        if !link.status.is_destructive() {
            let dangling = match existing {
                Some(EntryKind::Symlink) => Some(self.fs.read_link(source)?),
                _ => None,
            };
            journal.links.push((source.to_path_buf(), dangling));
        }

        if let Some(kind) = existing {
            let directory = kind == EntryKind::Directory;
            if directory {
                self.fs.remove_tree(source)?;
            } else {
                self.fs.remove_entry(source)?;
            }
            self.reporter.notify(&Event::Removed {
                path: source.to_path_buf(),
                directory,
            });
        }

        self.ensure_parent(source, journal)?;
        self.fs.symlink(source, &link.target)?;
        self.reporter.notify(&Event::Created {
            source: source.to_path_buf(),
            target: link.target.clone(),
        });
        Ok(())
    }

    fn ensure_parent(&self, path: &Path, journal: &mut Journal) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || self.fs.entry_kind(parent).is_some() {
            return Ok(());
        }

        let outermost = parent
            .ancestors()
            .take_while(|dir| !dir.as_os_str().is_empty() && self.fs.entry_kind(dir).is_none())
            .last()
            .unwrap_or(parent)
            .to_path_buf();
        self.fs.create_dir_all(parent)?;
        journal.dirs.push(outermost);
        Ok(())
    }

    /// Name the entry a failed replacement leaves behind.
    ///
    /// When the original was already removed, the only copy left is the one
    /// in the backup set, which is deleted when the run ends.
    fn report_failure(&mut self, link: &PlannedLink, backup: &BackupSet) {
        let source = link.source.as_path();
        let lost = link.status.is_destructive() && self.fs.entry_kind(source).is_none();
        if lost {
            let stored = backup.record_for(source).map(|r| r.stored.clone());
            tracing::warn!(
                source = %source.display(),
                stored = ?stored,
                "original entry removed but link not created"
            );
        }
        self.reporter.notify(&Event::ApplyFailed {
            source: source.to_path_buf(),
            lost,
        });
    }

    /// Remove what Applying created where nothing existed, newest first.
    fn undo_created(&mut self, journal: &Journal) -> Result<usize> {
        let mut removed = 0;

        for (source, dangling) in journal.links.iter().rev() {
            if self.fs.entry_kind(source).is_none() {
                continue;
            }
            self.fs.remove_entry(source)?;
            self.reporter.notify(&Event::Removed {
                path: source.clone(),
                directory: false,
            });
            removed += 1;
            if let Some(destination) = dangling {
                self.fs.symlink(source, destination)?;
            }
        }

        for dir in journal.dirs.iter().rev() {
            if self.fs.entry_kind(dir) != Some(EntryKind::Directory) {
                continue;
            }
            self.fs.remove_tree(dir)?;
            self.reporter.notify(&Event::Removed {
                path: dir.clone(),
                directory: true,
            });
            removed += 1;
        }

        tracing::debug!(removed, "created entries removed");
        Ok(removed)
    }
}
