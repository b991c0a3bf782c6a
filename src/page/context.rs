use serde::{Deserialize, Serialize};

use crate::error::AutofillError;
use crate::field::field_model::FieldDescriptor;
use crate::field::filler::FillOutcome;
use crate::page::locator::Locator;

/// Request crossing into the page. Only serializable data crosses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PageRequest {
    ExtractFields,
    FillField {
        id: String,
        #[serde(rename = "xpath", default, skip_serializing_if = "Option::is_none")]
        locator: Option<Locator>,
        value: String,
    },
    CaptureMarkup,
}

impl PageRequest {
    pub fn fill(field: &FieldDescriptor) -> Self {
        PageRequest::FillField {
            id: field.id.clone(),
            locator: field.locator.clone(),
            value: field.value.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageRequest::ExtractFields => "extract_fields",
            PageRequest::FillField { .. } => "fill_field",
            PageRequest::CaptureMarkup => "capture_markup",
        }
    }
}

/// Reply coming back out of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageResponse {
    Fields { fields: Vec<FieldDescriptor> },
    FillAck { id: String, outcome: FillOutcome },
    Markup { html: String },
}

impl PageResponse {
    fn name(&self) -> &'static str {
        match self {
            PageResponse::Fields { .. } => "fields",
            PageResponse::FillAck { .. } => "fill_ack",
            PageResponse::Markup { .. } => "markup",
        }
    }
}

/// The boundary between the panel and a page.
///
/// Implementors only need `send`; the typed helpers check that each request
/// got the matching response.
pub trait PageContext {
    fn send(&mut self, request: PageRequest) -> Result<PageResponse, AutofillError>;

    fn extract_fields(&mut self) -> Result<Vec<FieldDescriptor>, AutofillError> {
        match self.send(PageRequest::ExtractFields)? {
            PageResponse::Fields { fields } => Ok(fields),
            other => Err(unexpected("extract_fields", &other)),
        }
    }

    fn fill_field(&mut self, field: &FieldDescriptor) -> Result<FillOutcome, AutofillError> {
        let request = PageRequest::fill(field);
        let name = request.name();
        match self.send(request)? {
            PageResponse::FillAck { outcome, .. } => Ok(outcome),
            other => Err(unexpected(name, &other)),
        }
    }

    fn capture_markup(&mut self) -> Result<String, AutofillError> {
        match self.send(PageRequest::CaptureMarkup)? {
            PageResponse::Markup { html } => Ok(html),
            other => Err(unexpected("capture_markup", &other)),
        }
    }
}

fn unexpected(request: &str, response: &PageResponse) -> AutofillError {
    AutofillError::UnexpectedResponse {
        request: request.to_string(),
        actual: response.name().to_string(),
    }
}
