#![allow(dead_code)]

use rexy::AutofillError;
use rexy::page::context::{PageContext, PageRequest, PageResponse};
use rexy::page::local::LocalPage;

pub const CONTACT_FORM: &str = include_str!("../fixtures/contact_form.html");

pub fn fixture(name: &str) -> String {
    let path = std::env::current_dir()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

pub fn contact_page() -> LocalPage {
    LocalPage::from_html(CONTACT_FORM)
}

/// Local page that remembers every request it was sent.
pub struct RecordingPage {
    pub inner: LocalPage,
    pub requests: Vec<PageRequest>,
}

impl RecordingPage {
    pub fn new(html: &str) -> Self {
        RecordingPage {
            inner: LocalPage::from_html(html),
            requests: Vec::new(),
        }
    }

    pub fn filled_ids(&self) -> Vec<String> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                PageRequest::FillField { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PageContext for RecordingPage {
    fn send(&mut self, request: PageRequest) -> Result<PageResponse, AutofillError> {
        self.requests.push(request.clone());
        self.inner.send(request)
    }
}

/// Page whose every request fails, like a tab that went away.
pub struct BrokenPage;

impl PageContext for BrokenPage {
    fn send(&mut self, _request: PageRequest) -> Result<PageResponse, AutofillError> {
        Err(AutofillError::SessionIO("page is gone".into()))
    }
}

/// Page that answers fill requests with extraction results.
pub struct ConfusedPage;

impl PageContext for ConfusedPage {
    fn send(&mut self, _request: PageRequest) -> Result<PageResponse, AutofillError> {
        Ok(PageResponse::Fields { fields: Vec::new() })
    }
}
