use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::panel::panel_model::PanelStatus;

/// One line of the panel journal.
#[derive(Debug, Serialize)]
pub struct PanelEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub action: String,
    pub status: String,

    pub field_id: Option<String>,
    pub detail: Option<String>,
}

impl PanelEvent {
    pub fn now(step: u64, action: &str, status: &PanelStatus) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            action: action.to_string(),
            status: format!("{:?}", status),
            field_id: None,
            detail: None,
        }
    }

    pub fn with_field(mut self, field_id: &str) -> Self {
        self.field_id = Some(field_id.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
