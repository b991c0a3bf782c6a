use crate::error::AutofillError;
use crate::field::extractor::extract_fields;
use crate::field::filler::fill_field;
use crate::page::context::{PageContext, PageRequest, PageResponse};
use crate::page::document::Document;
use crate::page::sanitize::sanitized_markup;

/// A page held in process. Extraction and filling run directly on its
/// document; callers still go through `PageContext` requests.
#[derive(Debug)]
pub struct LocalPage {
    document: Document,
}

impl LocalPage {
    pub fn new(document: Document) -> Self {
        LocalPage { document }
    }

    pub fn from_html(html: &str) -> Self {
        LocalPage::new(Document::parse(html))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl PageContext for LocalPage {
    fn send(&mut self, request: PageRequest) -> Result<PageResponse, AutofillError> {
        let response = match request {
            PageRequest::ExtractFields => PageResponse::Fields {
                fields: extract_fields(&self.document),
            },
            PageRequest::FillField { id, locator, value } => {
                let outcome = fill_field(&mut self.document, &id, locator.as_ref(), &value);
                PageResponse::FillAck { id, outcome }
            }
            PageRequest::CaptureMarkup => PageResponse::Markup {
                html: sanitized_markup(&self.document),
            },
        };
        Ok(response)
    }
}
