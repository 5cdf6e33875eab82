//! Thread-safe diagnostic accumulator.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Collects the diagnostics of one resolution run.
///
/// Passed by shared reference; artifacts from several folders may be checked
/// concurrently by a host, so emission only needs `&self`.
pub struct DiagnosticSink {
    recorded: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            errors: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // A panic while pushing leaves the vector intact.
        self.recorded.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.lock().push(diag);
    }

    /// Returns `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors recorded so far, including drained ones.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Number of recorded diagnostics at or above `severity`.
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.lock().iter().filter(|d| d.severity >= severity).count()
    }

    /// The most serious severity recorded, if anything was recorded.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.lock().iter().map(|d| d.severity).max()
    }

    /// Returns `true` if a diagnostic with `code` was recorded.
    pub fn contains_code(&self, code: DiagnosticCode) -> bool {
        self.lock().iter().any(|d| d.code == code)
    }

    /// Copies of every recorded diagnostic with `code`.
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<Diagnostic> {
        self.lock().iter().filter(|d| d.code == code).cloned().collect()
    }

    /// Drains every recorded diagnostic in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Copies every recorded diagnostic without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::codes;

    fn skipped_artifact() -> Diagnostic {
        Diagnostic::warning(codes::INVALID_DEPENDENCY_ARTIFACT, "skipped artifact")
            .with_path("deps/com.lib-binding_classes.json")
    }

    fn missing_log() -> Diagnostic {
        Diagnostic::note(codes::MISSING_LOG, "no dependency log")
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.worst_severity(), None);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn recovered_conditions_are_not_errors() {
        let sink = DiagnosticSink::new();
        sink.emit(missing_log());
        sink.emit(skipped_artifact());
        assert!(!sink.has_errors());
        assert_eq!(sink.worst_severity(), Some(Severity::Warning));
        assert_eq!(sink.count_at_least(Severity::Warning), 1);
        assert_eq!(sink.count_at_least(Severity::Help), 2);
    }

    #[test]
    fn lookup_by_code() {
        let sink = DiagnosticSink::new();
        sink.emit(skipped_artifact());
        sink.emit(skipped_artifact());
        sink.emit(missing_log());
        assert!(sink.contains_code(codes::MISSING_LOG));
        assert!(!sink.contains_code(codes::CORRUPT_LOG));
        assert_eq!(sink.with_code(codes::INVALID_DEPENDENCY_ARTIFACT).len(), 2);
    }

    #[test]
    fn error_count_survives_draining() {
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::error(codes::CORRUPT_LOG, "cannot continue"));
        sink.emit(missing_log());
        let drained = sink.take_all();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].code, codes::CORRUPT_LOG);
        assert!(sink.diagnostics().is_empty());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn concurrent_emission() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..25 {
                        sink.emit(skipped_artifact());
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(sink.diagnostics().len(), 100);
        assert_eq!(sink.error_count(), 0);
    }
}
