use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AutofillError;
use crate::field::extractor::extract_fields;
use crate::field::filler::FillOutcome;
use crate::page::context::{PageContext, PageRequest, PageResponse};
use crate::page::document::Document;
use crate::page::sanitize::sanitized_markup;

pub const DEFAULT_SCRIPT: &str = "node/page_server.js";

/// Request sent to the page helper over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Content {
        cmd: &'static str,
    },
    Fill {
        cmd: &'static str,
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        xpath: Option<String>,
        value: String,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn content() -> Self {
        BrowserRequest::Content { cmd: "content" }
    }

    pub fn fill(id: &str, xpath: Option<String>, value: &str) -> Self {
        BrowserRequest::Fill {
            cmd: "fill",
            id: id.to_string(),
            xpath,
            value: value.to_string(),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from the page helper over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub outcome: Option<FillOutcome>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// Line-delimited JSON conversation with the page helper.
///
/// Generic over the byte streams so the exchange can run against any pair
/// of pipes.
pub struct HelperChannel<W, R> {
    writer: W,
    reader: R,
}

impl<W: Write, R: BufRead> HelperChannel<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        HelperChannel { writer, reader }
    }

    /// Block until the helper announces it is ready to take commands.
    pub fn await_ready(&mut self) -> Result<(), AutofillError> {
        let reply = self.receive("launch")?;
        match (reply.ok, reply.ready) {
            (true, Some(true)) => Ok(()),
            _ => Err(AutofillError::SessionProtocol {
                command: "launch".into(),
                error: reply.error.unwrap_or_else(|| "helper started without announcing readiness".into()),
            }),
        }
    }

    /// One request line out, one reply line back. A reply with `ok: false`
    /// becomes an error carrying the helper's message.
    pub fn call(&mut self, request: &BrowserRequest, command: &str) -> Result<BrowserResponse, AutofillError> {
        self.post(request, command)?;
        let reply = self.receive(command)?;
        if reply.ok {
            return Ok(reply);
        }
        Err(AutofillError::SessionProtocol {
            command: command.into(),
            error: reply.error.unwrap_or_else(|| "helper gave no reason".into()),
        })
    }

    pub fn post(&mut self, request: &BrowserRequest, command: &str) -> Result<(), AutofillError> {
        let mut line = serde_json::to_vec(request).map_err(|e| AutofillError::JsonSerialize {
            context: format!("{} request", command),
            source: e,
        })?;
        line.push(b'\n');

        self.writer
            .write_all(&line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| AutofillError::SessionIO(format!("sending '{}' to page helper: {}", command, e)))
    }

    pub fn receive(&mut self, command: &str) -> Result<BrowserResponse, AutofillError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| AutofillError::SessionIO(format!("awaiting '{}' reply: {}", command, e)))?;
        if read == 0 {
            return Err(AutofillError::SessionIO(format!(
                "page helper closed its output before answering '{}'",
                command
            )));
        }

        serde_json::from_str(line.trim_end()).map_err(|e| AutofillError::JsonParse {
            context: format!("{} reply", command),
            source: e,
        })
    }
}

/// A live browser page behind a long-lived Node.js helper.
///
/// Commands go out as NDJSON over stdin, responses come back on stdout.
/// Field extraction runs on a snapshot of the page's HTML; fills are
/// performed by the helper inside the page (native setter, then bubbling
/// `input`/`change` events).
pub struct BrowserSession {
    child: Child,
    channel: HelperChannel<ChildStdin, BufReader<ChildStdout>>,
    current_url: Option<String>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the helper script and wait for its ready line.
    pub fn launch(script: &str) -> Result<Self, AutofillError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AutofillError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let pipes = child.stdin.take().zip(child.stdout.take());
        let Some((stdin, stdout)) = pipes else {
            let _ = child.kill();
            return Err(AutofillError::SessionIO(format!("{} started without stdio pipes", script)));
        };

        let mut channel = HelperChannel::new(stdin, BufReader::new(stdout));
        if let Err(e) = channel.await_ready() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }

        debug!(script, "page helper ready");
        Ok(BrowserSession {
            child,
            channel,
            current_url: None,
            closed: false,
        })
    }

    pub fn navigate(&mut self, url: &str) -> Result<(), AutofillError> {
        let response = self.channel.call(&BrowserRequest::navigate(url), "navigate")?;
        self.current_url = Some(response.url.unwrap_or_else(|| url.to_string()));
        Ok(())
    }

    /// Full HTML of the current page.
    pub fn content(&mut self) -> Result<String, AutofillError> {
        let response = self.channel.call(&BrowserRequest::content(), "content")?;
        response.html.ok_or_else(|| AutofillError::SessionProtocol {
            command: "content".into(),
            error: "No html in content response".into(),
        })
    }

    /// Last URL navigated to (cached, no browser call).
    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn quit(&mut self) -> Result<(), AutofillError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // The helper may already be gone.
        let _ = self.channel.post(&BrowserRequest::quit(), "quit");
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageContext for BrowserSession {
    fn send(&mut self, request: PageRequest) -> Result<PageResponse, AutofillError> {
        match request {
            PageRequest::ExtractFields => {
                let html = self.content()?;
                let snapshot = Document::parse(&html);
                Ok(PageResponse::Fields {
                    fields: extract_fields(&snapshot),
                })
            }
            PageRequest::FillField { id, locator, value } => {
                let xpath = locator.map(|l| l.to_string());
                let response = self.channel.call(&BrowserRequest::fill(&id, xpath, &value), "fill")?;
                let outcome = response.outcome.unwrap_or_else(|| {
                    warn!(field = %id, "page helper did not report a fill outcome");
                    FillOutcome::Filled
                });
                Ok(PageResponse::FillAck { id, outcome })
            }
            PageRequest::CaptureMarkup => {
                let html = self.content()?;
                Ok(PageResponse::Markup {
                    html: sanitized_markup(&Document::parse(&html)),
                })
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
