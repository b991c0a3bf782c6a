use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::AutofillError;
use crate::field::field_model::FieldDescriptor;
use crate::field::filler::FillOutcome;
use crate::page::context::PageContext;
use crate::panel::panel_model::{FillAllSummary, FillResult, PanelState, PanelStatus};
use crate::proposer::ValueProposer;
use crate::proposer::heuristic::HeuristicProposer;
use crate::trace::{logger::TraceLogger, trace::PanelEvent};

/// Pause between consecutive fills of a fill-all pass.
pub const DEFAULT_FILL_DELAY: Duration = Duration::from_millis(100);

/// Drives scan / fill / revert against a page.
///
/// State machine: Idle -> Scanning -> Idle. All state lives in `PanelState`;
/// the page is only reached through `PageContext` requests.
pub struct Panel {
    state: PanelState,
    proposer: Box<dyn ValueProposer>,
    fill_delay: Duration,
    journal: TraceLogger,
    step: u64,
}

impl Panel {
    pub fn new(proposer: Box<dyn ValueProposer>) -> Panel {
        Panel {
            state: PanelState::new(),
            proposer,
            fill_delay: DEFAULT_FILL_DELAY,
            journal: TraceLogger::disabled(),
            step: 0,
        }
    }

    /// Panel with the keyword-table proposer.
    pub fn with_heuristic() -> Panel {
        Panel::new(Box::new(HeuristicProposer))
    }

    pub fn with_fill_delay(mut self, delay: Duration) -> Panel {
        self.fill_delay = delay;
        self
    }

    pub fn with_journal(mut self, journal: TraceLogger) -> Panel {
        self.journal = journal;
        self
    }

    pub fn with_autofill(mut self, enabled: bool) -> Panel {
        self.state.autofill_enabled = enabled;
        self
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.state.fields
    }

    pub fn fill_delay(&self) -> Duration {
        self.fill_delay
    }

    pub fn proposer_name(&self) -> &'static str {
        self.proposer.name()
    }

    fn record(&mut self, action: &str, field_id: Option<&str>, detail: Option<String>) {
        let mut event = PanelEvent::now(self.step, action, &self.state.status);
        if let Some(id) = field_id {
            event = event.with_field(id);
        }
        if let Some(d) = detail {
            event = event.with_detail(d);
        }
        self.step += 1;
        self.journal.log(&event);
    }

    // ---- Scan ----

    /// Re-derive the field list from the page and propose values.
    ///
    /// On success the list is replaced; filled markers are kept (only
    /// `revert_all` clears them). On failure the previous list stays and the
    /// error is returned after being logged. Either way the panel ends Idle.
    pub fn scan(&mut self, page: &mut dyn PageContext) -> Result<usize, AutofillError> {
        self.state.status = PanelStatus::Scanning;
        self.record("scan_started", None, Some(self.proposer.name().to_string()));

        let result = self.collect_fields(page);
        self.state.status = PanelStatus::Idle;

        match result {
            Ok(fields) => {
                let count = fields.len();
                info!(count, proposer = self.proposer.name(), "scan complete");
                self.state.fields = fields;
                self.record("scan_completed", None, Some(format!("{} fields", count)));
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "error scanning for inputs");
                self.record("scan_failed", None, Some(e.to_string()));
                Err(e)
            }
        }
    }

    fn collect_fields(&self, page: &mut dyn PageContext) -> Result<Vec<FieldDescriptor>, AutofillError> {
        let mut fields = page.extract_fields()?;
        self.proposer.propose(&mut fields, page)?;
        Ok(fields)
    }

    // ---- Fill ----

    /// Apply the proposed value of one field and toggle its filled marker
    /// once the page acknowledges.
    pub fn fill_one(&mut self, page: &mut dyn PageContext, field_id: &str) -> Result<FillResult, AutofillError> {
        if !self.state.autofill_enabled {
            debug!(field = field_id, "autofill disabled, not filling");
            return Ok(FillResult::Disabled);
        }

        let Some(field) = self.state.field(field_id).cloned() else {
            warn!(field = field_id, "no such field in the current scan");
            return Ok(FillResult::UnknownField);
        };

        if !field.kind.is_fillable() {
            debug!(field = field_id, kind = field.kind.as_str(), "field kind is not fillable");
            return Ok(FillResult::NotFillable);
        }

        let outcome = match page.fill_field(&field) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(field = field_id, error = %e, "error filling input");
                self.record("fill_failed", Some(field_id), Some(e.to_string()));
                return Err(e);
            }
        };

        let filled = self.state.toggle_filled(field_id);
        if filled {
            info!(field = field_id, "filling field with suggested value");
        } else {
            info!(field = field_id, "reverting field marker");
        }
        self.record("fill", Some(field_id), Some(format!("{:?}", outcome)));

        Ok(FillResult::Applied { outcome, filled })
    }

    /// Fill every field in scan order, one at a time, pausing `fill_delay`
    /// between fills. A failing field is logged and the pass continues.
    pub fn fill_all(&mut self, page: &mut dyn PageContext) -> FillAllSummary {
        let mut summary = FillAllSummary::default();
        if !self.state.autofill_enabled {
            debug!("autofill disabled, not filling");
            return summary;
        }

        let ids: Vec<String> = self.state.fields.iter().map(|f| f.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                thread::sleep(self.fill_delay);
            }
            summary.attempted += 1;
            match self.fill_one(page, id) {
                Ok(FillResult::Applied { outcome: FillOutcome::Filled, .. }) => summary.filled += 1,
                Ok(FillResult::Applied { outcome: FillOutcome::Skipped, .. }) => summary.skipped += 1,
                Ok(_) => summary.not_applied += 1,
                Err(_) => summary.failed += 1,
            }
        }

        self.state.all_filled =
            !self.state.fields.is_empty() && self.state.filled_count() == self.state.fields.len();
        self.record(
            "fill_all",
            None,
            Some(format!(
                "{} filled, {} skipped, {} not applied, {} failed",
                summary.filled, summary.skipped, summary.not_applied, summary.failed
            )),
        );
        summary
    }

    // ---- Revert / toggles ----

    /// Forget which fields were filled. The page and the proposed values are
    /// left as they are.
    pub fn revert_all(&mut self) {
        self.state.filled.clear();
        self.state.all_filled = false;
        info!("reverting all fields");
        self.record("revert_all", None, None);
    }

    /// Switch autofill on/off; returns the new setting.
    pub fn toggle_autofill(&mut self) -> bool {
        self.state.autofill_enabled = !self.state.autofill_enabled;
        let enabled = self.state.autofill_enabled;
        self.record("toggle_autofill", None, Some(enabled.to_string()));
        enabled
    }
}
