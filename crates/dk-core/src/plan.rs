//! Reconciliation plan
//!
//! The partition of a mapping into status buckets. This is what gets
//! previewed to the user and what the confirmation gates decide on.

use std::path::PathBuf;

use dk_fs::{Filesystem, PathResolver};
use serde::{Deserialize, Serialize};

use crate::mapping::LinkMapping;
use crate::status::{LinkStatus, TargetValidity, classify_link, classify_target};

/// A mapping entry after classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLink {
    /// Expanded, absolute source path
    pub source: PathBuf,
    /// Expanded, absolute target path, as written into the symlink
    pub target: PathBuf,
    /// Link status at classification time
    pub status: LinkStatus,
    /// Target existence at classification time
    pub target_validity: TargetValidity,
}

/// Every mapping entry, partitioned by [`LinkStatus`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    pub correct: Vec<PlannedLink>,
    pub missing: Vec<PlannedLink>,
    pub incorrect: Vec<PlannedLink>,
    pub nonlink: Vec<PlannedLink>,
}

impl ReconciliationPlan {
    /// Classify every entry of `mapping` against the filesystem.
    pub fn classify(fs: &dyn Filesystem, paths: &PathResolver, mapping: &LinkMapping) -> Self {
        let mut plan = Self::default();
        for entry in mapping {
            let source = paths.absolute(&entry.source);
            let target = paths.absolute(&entry.target);
            let status = classify_link(fs, paths, &source, &target);
            let target_validity = classify_target(fs, paths, &target);
            tracing::debug!(
                source = %source.display(),
                target = %target.display(),
                %status,
                %target_validity,
                "classified link"
            );
            plan.push(PlannedLink {
                source,
                target,
                status,
                target_validity,
            });
        }
        plan
    }

    /// Add a classified link to the bucket matching its status.
    pub fn push(&mut self, link: PlannedLink) {
        let bucket = match link.status {
            LinkStatus::Correct => &mut self.correct,
            LinkStatus::Missing => &mut self.missing,
            LinkStatus::Incorrect => &mut self.incorrect,
            LinkStatus::Nonlink => &mut self.nonlink,
        };
        bucket.push(link);
    }

    /// Rows in preview order: correct, missing, incorrect, nonlink.
    pub fn rows(&self) -> impl Iterator<Item = &PlannedLink> {
        self.correct
            .iter()
            .chain(&self.missing)
            .chain(&self.incorrect)
            .chain(&self.nonlink)
    }

    /// Links requiring action in apply order: incorrect, missing, nonlink.
    pub fn pending(&self) -> impl Iterator<Item = &PlannedLink> {
        self.incorrect
            .iter()
            .chain(&self.missing)
            .chain(&self.nonlink)
    }

    /// Links whose source gets overwritten, in backup order: incorrect, nonlink.
    pub fn destructive(&self) -> impl Iterator<Item = &PlannedLink> {
        self.incorrect.iter().chain(&self.nonlink)
    }

    /// Targets that do not exist among links requiring action
    pub fn missing_targets(&self) -> Vec<PathBuf> {
        self.pending()
            .filter(|link| link.target_validity == TargetValidity::Missing)
            .map(|link| link.target.clone())
            .collect()
    }

    /// Number of links requiring action
    pub fn pending_count(&self) -> usize {
        self.incorrect.len() + self.missing.len() + self.nonlink.len()
    }

    /// Whether every link is already correct
    pub fn is_noop(&self) -> bool {
        !self.rows().any(|link| link.status.needs_action())
    }

    /// Total number of classified links
    pub fn len(&self) -> usize {
        self.correct.len() + self.pending_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
