//! Filesystem abstraction for DotKeeper
//!
//! Provides home-aware path resolution and the [`Filesystem`] trait through
//! which every link inspection and mutation flows.

pub mod checksum;
pub mod error;
pub mod fs;
pub mod path;

pub use error::{Error, Result};
pub use fs::{EntryKind, Filesystem, RealFs};
pub use path::{PathResolver, normalize_lexical};
