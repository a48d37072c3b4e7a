//! Shared test utilities for the DotKeeper workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`home`]: [`home::TestHome`], a temporary home directory with dotfiles
//! - [`script`]: a scripted [`dk_core::Confirmer`] and a recording
//!   [`dk_core::Reporter`]

pub mod home;
pub mod script;

pub use home::TestHome;
pub use script::{RecordingReporter, ScriptedConfirmer};
