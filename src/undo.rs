//! Undo stack for bulk tab closures.
//!
//! Each bulk close pushes the closed tabs as one batch; undo pops the most
//! recent batch and reopens its tabs in their original order. Reopen calls
//! are fire-and-forget: they are submitted in order through the
//! [`TabOpener`] capability and a failure on one tab never stops the rest
//! of the batch. Undo is single-use; a popped batch is gone even if some
//! reopens failed.

use anyhow::Result;

use crate::tab::{TabInput, TabRecord, TabUri};

/// Maximum number of closure batches retained for undo.
pub const MAX_UNDO_BATCHES: usize = 100;

/// Host-side open capability. Implementations report their own progress;
/// the undo stack only submits, it never awaits completion.
pub trait TabOpener {
    /// Open a single-location tab (text, notebook or custom editor).
    fn open(&mut self, uri: &TabUri) -> Result<()>;
    /// Open a diff view between two locations.
    fn open_diff(&mut self, original: &TabUri, modified: &TabUri) -> Result<()>;
}

/// One tab that could not be reopened during undo. Reported to the user by
/// the caller, never propagated as a fatal error.
#[derive(Debug)]
pub struct OpenFailure {
    pub label: String,
    pub error: anyhow::Error,
}

#[derive(Default)]
pub struct UndoStack {
    batches: Vec<Vec<TabRecord>>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tabs closed by one bulk action as a single undo unit.
    /// The oldest batch is dropped once the stack is full.
    pub fn push(&mut self, batch: Vec<TabRecord>) {
        self.batches.push(batch);
        if self.batches.len() > MAX_UNDO_BATCHES {
            self.batches.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Pop the most recent batch and reopen each of its tabs in original
    /// order. With nothing to undo this is a no-op, not an error.
    ///
    /// Returns the tabs that failed to reopen; the batch is consumed either
    /// way (a failed reopen is not retried by a second undo).
    pub fn undo(&mut self, opener: &mut dyn TabOpener) -> Vec<OpenFailure> {
        let Some(batch) = self.batches.pop() else {
            return Vec::new();
        };

        let mut failures = Vec::new();
        for tab in &batch {
            let result = match tab.input() {
                TabInput::Text { uri } | TabInput::Notebook { uri } | TabInput::Custom { uri } => {
                    opener.open(uri)
                }
                TabInput::TextDiff { original, modified }
                | TabInput::NotebookDiff { original, modified } => {
                    opener.open_diff(original, modified)
                }
                // Nothing reopenable behind these kinds.
                TabInput::Webview | TabInput::Terminal | TabInput::Unknown => continue,
            };

            if let Err(error) = result {
                failures.push(OpenFailure {
                    label: tab.label().to_string(),
                    error,
                });
            }
        }
        failures
    }
}
