use std::collections::BTreeSet;

use crate::field::field_model::FieldDescriptor;
use crate::field::filler::FillOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Idle,
    Scanning,
}

/// Everything the panel knows; owned by the panel, never shared.
#[derive(Debug, Clone)]
pub struct PanelState {
    /// Fields of the latest successful scan, in scan order.
    pub fields: Vec<FieldDescriptor>,
    /// Identifiers currently marked as filled.
    pub filled: BTreeSet<String>,
    pub status: PanelStatus,
    pub autofill_enabled: bool,
    pub all_filled: bool,
}

impl PanelState {
    pub fn new() -> Self {
        PanelState {
            fields: Vec::new(),
            filled: BTreeSet::new(),
            status: PanelStatus::Idle,
            autofill_enabled: true,
            all_filled: false,
        }
    }

    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn is_filled(&self, id: &str) -> bool {
        self.filled.contains(id)
    }

    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }

    pub fn is_scanning(&self) -> bool {
        self.status == PanelStatus::Scanning
    }

    /// Flip the filled marker of `id`; returns the new state.
    pub fn toggle_filled(&mut self, id: &str) -> bool {
        if self.filled.remove(id) {
            false
        } else {
            self.filled.insert(id.to_string());
            true
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a single fill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillResult {
    /// The page acknowledged; `filled` is the marker state afterwards.
    Applied { outcome: FillOutcome, filled: bool },
    /// Autofill is switched off.
    Disabled,
    /// The field kind cannot take a scripted value (file inputs).
    NotFillable,
    /// No field with that identifier in the current scan.
    UnknownField,
}

/// Tally of a fill-all pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillAllSummary {
    pub attempted: usize,
    pub filled: usize,
    pub skipped: usize,
    pub not_applied: usize,
    pub failed: usize,
}
