//! Shared collection point for findings from UCF checks and search shards.

use crate::diagnostic::Diagnostic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collects diagnostics from the library checks and from exhaustive-search
/// shards running on rayon workers.
///
/// Shards finish in whatever order the pool schedules them, so
/// [`take_sorted`](Self::take_sorted) gives a stable order for rendering.
/// The error count survives draining.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic. Safe to call from several workers at once.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.diagnostics.lock().unwrap().push(diag);
    }

    /// Returns `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Errors recorded since the sink was created.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns `true` if nothing is waiting to be taken.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().unwrap().is_empty()
    }

    /// Drains the sink in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock().unwrap())
    }

    /// Drains the sink, most severe first, then by code and subject.
    ///
    /// Diagnostics that compare equal keep their emission order.
    pub fn take_sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.take_all();
        diagnostics.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.code.to_string().cmp(&b.code.to_string()))
                .then_with(|| a.subject.cmp(&b.subject))
        });
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::severity::Severity;

    const SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Search, 203);
    const MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Library, 101);

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(sink.is_empty());
        assert!(!sink.has_errors());
        assert!(sink.take_sorted().is_empty());
    }

    #[test]
    fn error_count_survives_draining() {
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::error(MISMATCH, "input sensors do not fit the design"));
        sink.emit(Diagnostic::note(SKIPPED, "candidates skipped"));
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.is_empty());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn sorted_by_severity_then_subject() {
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::note(SKIPPED, "skipped").with_subject("inputs pTet"));
        sink.emit(Diagnostic::note(SKIPPED, "skipped").with_subject("inputs pBAD"));
        sink.emit(Diagnostic::error(MISMATCH, "mismatch"));
        let sorted = sink.take_sorted();
        assert_eq!(sorted[0].severity, Severity::Error);
        assert_eq!(sorted[1].subject.as_deref(), Some("inputs pBAD"));
        assert_eq!(sorted[2].subject.as_deref(), Some("inputs pTet"));
    }

    #[test]
    fn concurrent_shards_render_in_stable_order() {
        use std::sync::Arc;
        use std::thread;

        let run = |reverse: bool| {
            let sink = Arc::new(DiagnosticSink::new());
            let mut shards: Vec<usize> = (0..8).collect();
            if reverse {
                shards.reverse();
            }
            let handles: Vec<_> = shards
                .into_iter()
                .map(|shard| {
                    let sink = Arc::clone(&sink);
                    thread::spawn(move || {
                        let subject = format!("shard {shard}");
                        sink.emit(Diagnostic::note(SKIPPED, "skipped").with_subject(subject));
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            sink.take_sorted()
                .into_iter()
                .map(|d| d.subject.unwrap_or_default())
                .collect::<Vec<_>>()
        };
        let forward = run(false);
        assert_eq!(forward.len(), 8);
        assert_eq!(forward, run(true));
    }
}
