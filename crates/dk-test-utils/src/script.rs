//! Deterministic stand-ins for the interactive collaborators.

use std::collections::VecDeque;

use dk_core::{Confirmer, Event, Gate, ReconciliationPlan, Reporter};

/// Answers gates from a fixed script and records which gates were asked.
///
/// Asking more questions than scripted is an error, which surfaces an
/// unexpected extra gate as a test failure.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: VecDeque<bool>,
    /// Gates asked, in order
    pub asked: Vec<Gate>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }

    /// Answers not consumed by the run
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, gate: Gate) -> dk_core::Result<bool> {
        self.asked.push(gate);
        self.answers
            .pop_front()
            .ok_or_else(|| dk_core::Error::prompt(format!("unscripted gate: {gate:?}")))
    }
}

/// Records the preview and every event of a run.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    /// Plans passed to `preview`
    pub previews: Vec<ReconciliationPlan>,
    /// Events in order
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single previewed plan.
    pub fn plan(&self) -> &ReconciliationPlan {
        assert_eq!(self.previews.len(), 1, "expected exactly one preview");
        &self.previews[0]
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Reporter for RecordingReporter {
    fn preview(&mut self, plan: &ReconciliationPlan) {
        self.previews.push(plan.clone());
    }

    fn notify(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
