//! Interactive prompts for the confirmation gates
//!
//! Uses dialoguer for terminal-based yes/no questions.

use dialoguer::Confirm;
use dk_core::{Confirmer, Gate};

/// Asks every gate on the terminal.
///
/// Escape or `q` at a prompt answers "no".
#[derive(Debug, Default)]
pub struct DialoguerConfirmer;

impl Confirmer for DialoguerConfirmer {
    fn confirm(&mut self, gate: Gate) -> dk_core::Result<bool> {
        println!();
        let answer = Confirm::new()
            .with_prompt(gate.prompt())
            .default(false)
            .interact_opt()
            .map_err(|e| dk_core::Error::prompt(e.to_string()))?;
        Ok(answer.unwrap_or(false))
    }
}
