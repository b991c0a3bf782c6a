use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::trace::trace::PanelEvent;

/// Append-only JSONL journal of panel actions, one `PanelEvent` per line.
///
/// A journal whose file cannot be opened stays usable and records nothing.
pub struct TraceLogger {
    sink: Option<(PathBuf, Mutex<File>)>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let opened = OpenOptions::new().create(true).append(true).open(path);
        match opened {
            Ok(file) => TraceLogger {
                sink: Some((PathBuf::from(path), Mutex::new(file))),
            },
            Err(e) => {
                warn!(path, error = %e, "could not open journal file, journal disabled");
                TraceLogger::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        TraceLogger { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, event: &PanelEvent) {
        let Some((path, file)) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(action = %event.action, error = %e, "journal event not serializable");
                return;
            }
        };

        let Ok(mut file) = file.lock() else {
            warn!(path = %path.display(), "journal lock poisoned, event dropped");
            return;
        };
        if let Err(e) = writeln!(file, "{}", line) {
            warn!(path = %path.display(), error = %e, "journal write failed");
        }
    }
}
