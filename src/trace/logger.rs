use std::cell::{Cell, RefCell};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::trace::trace::SessionTrace;

/// JSONL sink for one form session's [`SessionTrace`] events.
///
/// Each event is one line, flushed as it is written so a crashed session
/// still leaves a readable trace. An unopenable path leaves the logger inert.
pub struct TraceLogger {
    sink: Option<(PathBuf, RefCell<BufWriter<File>>)>,
    written: Cell<usize>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let sink = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some((path.to_path_buf(), RefCell::new(BufWriter::new(file)))),
            Err(e) => {
                warn!("session trace disabled, cannot open {}: {}", path.display(), e);
                None
            }
        };
        Self {
            sink,
            written: Cell::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self {
            sink: None,
            written: Cell::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|(path, _)| path.as_path())
    }

    /// Events successfully appended since this logger was opened.
    pub fn written(&self) -> usize {
        self.written.get()
    }

    pub fn log(&self, event: &SessionTrace) {
        let Some((path, writer)) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!("dropping {} trace event for {}: {}", event.event, event.storage_key, e);
                return;
            }
        };

        let mut writer = writer.borrow_mut();
        match writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            Ok(()) => self.written.set(self.written.get() + 1),
            Err(e) => warn!("trace write to {} failed: {}", path.display(), e),
        }
    }
}
