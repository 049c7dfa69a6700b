use std::sync::{Mutex, PoisonError};

use log::warn;

/// Receives advisory notices raised while assembling phases.
pub trait DiagnosticSink: Send + Sync {
    /// Called for a phase definition carrying a `deprecated` entry.
    ///
    /// `origin` has the form `<file>/<phase name>`.
    fn deprecated(&self, origin: &str, message: &str);
}

/// Forwards notices to the `log` facade at warning level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn deprecated(&self, origin: &str, message: &str) {
        warn!("{}: phase definition is deprecated: {}", origin, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub origin: String,
    pub message: String,
}

/// Buffers notices so callers can report them after a build.
#[derive(Debug, Default)]
pub struct CollectingSink {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns all buffered notices.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for CollectingSink {
    fn deprecated(&self, origin: &str, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                origin: origin.to_string(),
                message: message.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_buffers_in_order() {
        let sink = CollectingSink::new();
        sink.deprecated("a.yaml/gas", "use gas2");
        sink.deprecated("a.yaml/liquid", "removed soon");
        assert_eq!(sink.notices().len(), 2);

        let drained = sink.drain();
        assert_eq!(drained[0].origin, "a.yaml/gas");
        assert_eq!(drained[1].message, "removed soon");
        assert!(sink.notices().is_empty());
    }
}
