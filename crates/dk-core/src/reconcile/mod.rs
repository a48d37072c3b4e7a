//! Reconciliation of a link mapping against the filesystem
//!
//! - **engine**: the phase machine driving classify, preview, confirm,
//!   apply and restore
//! - **gate**: the three confirmation points and the [`Confirmer`] capability
//! - **report**: notifications and the run outcome

mod engine;
mod gate;
mod report;

pub use engine::{ReconcileOptions, Reconciler};
pub use gate::{Confirmer, FixedAnswer, Gate};
pub use report::{Event, ReconcileOutcome, Reporter};
