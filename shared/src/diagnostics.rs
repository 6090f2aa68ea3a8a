use std::cell::RefCell;

use crate::error::{ErrorKind, MapError};

/// Receives recoverable errors that an operation degrades to a no-op.
///
/// The marker engine and the host map never panic or return early on these;
/// they report here and carry on with the rest of the batch.
pub trait DiagnosticSink {
    fn report(&self, error: &MapError);
}

/// Emits each report as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &MapError) {
        tracing::warn!(kind = error.kind().as_str(), error = %error, "map diagnostic");
    }
}

/// Keeps every report in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: RefCell<Vec<MapError>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<MapError> {
        self.reports.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.reports
            .borrow()
            .iter()
            .filter(|err| err.kind() == kind)
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, error: &MapError) {
        self.reports.borrow_mut().push(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_arrival_order() {
        let sink = RecordingSink::new();
        sink.report(&MapError::UnknownDistrict("a".into()));
        sink.report(&MapError::invalid_argument("bad"));

        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].kind(), ErrorKind::UnknownDistrict);
        assert_eq!(sink.count_of(ErrorKind::InvalidArgument), 1);
    }
}
