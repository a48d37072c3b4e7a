//! Link reconciliation engine for DotKeeper
//!
//! This crate compares a declared mapping of symlink locations against the
//! filesystem and repairs what differs:
//!
//! - **Status classification**: each `(source, target)` pair is `Correct`,
//!   `Missing`, `Incorrect` or `Nonlink`
//! - **Reconciliation plan**: the mapping partitioned into those buckets,
//!   previewed before anything changes
//! - **Reconciler**: the confirm, back up, apply, confirm, restore sequence
//! - **Backup set**: temporary copies of replaced entries for rollback
//! - **Configuration**: discovery, YAML loading and variable interpolation
//!
//! # Architecture
//!
//! ```text
//!          dk-cli
//!            |
//!         dk-core
//!            |
//!          dk-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dk_core::{FixedAnswer, LinkMapping, Reconciler};
//! use dk_fs::{PathResolver, RealFs};
//!
//! fn example(reporter: &mut dyn dk_core::Reporter) -> dk_core::Result<()> {
//!     let mapping = LinkMapping::from_pairs([("~/.bashrc", "~/dotfiles/.bashrc")])?;
//!     let paths = PathResolver::from_env();
//!     let mut confirmer = FixedAnswer(true);
//!     Reconciler::new(&RealFs, &paths, &mut confirmer, reporter).run(&mapping)?;
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod mapping;
pub mod plan;
pub mod reconcile;
pub mod status;

pub use backup::{BackupRecord, BackupSet, RestoreSummary, StoredKind};
pub use config::{Config, ConfigLocator, InterpolationContext};
pub use error::{Error, Result};
pub use mapping::{LinkEntry, LinkMapping};
pub use plan::{PlannedLink, ReconciliationPlan};
pub use reconcile::{
    Confirmer, Event, FixedAnswer, Gate, ReconcileOptions, ReconcileOutcome, Reconciler, Reporter,
};
pub use status::{LinkStatus, TargetValidity, classify_link, classify_target};
