//! Confirmation gates
//!
//! The run blocks on exactly three yes/no questions. Answers come from an
//! injectable [`Confirmer`] so the protocol can be scripted.

use std::fmt;

use crate::Result;

/// A point where the run waits for a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Some links would point at targets that do not exist
    ContinueWithMissingTargets,
    /// Apply every pending change
    ApplyChanges,
    /// Keep the applied changes (answering no restores the backup)
    KeepChanges,
}

impl Gate {
    /// Question shown to the user
    pub fn prompt(self) -> &'static str {
        match self {
            Self::ContinueWithMissingTargets => "Continue anyway?",
            Self::ApplyChanges => "Do you want to apply all changes?",
            Self::KeepChanges => "Is everything correct?",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt())
    }
}

/// Capability to answer a [`Gate`]
pub trait Confirmer {
    /// Ask the question for `gate`. `Ok(false)` is a refusal, not an error.
    fn confirm(&mut self, gate: Gate) -> Result<bool>;
}

/// Answers every gate with the same value
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&mut self, _gate: Gate) -> Result<bool> {
        Ok(self.0)
    }
}
