//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::CensusEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// The dispatcher is itself a `CensusEventHandler`, so a pipeline can be
/// handed one value that forwards to any number of observers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn CensusEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn CensusEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A handler that panics does not prevent later handlers from receiving the event.
    fn emit<F: Fn(&dyn CensusEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }
}

impl CensusEventHandler for EventDispatcher {
    fn on_scan_started(&self, event: &ScanStartedEvent) {
        self.emit(|h| h.on_scan_started(event));
    }

    fn on_files_discovered(&self, event: &FilesDiscoveredEvent) {
        self.emit(|h| h.on_files_discovered(event));
    }

    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        self.emit(|h| h.on_scan_progress(event));
    }

    fn on_file_skipped(&self, event: &FileSkippedEvent) {
        self.emit(|h| h.on_file_skipped(event));
    }

    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.emit(|h| h.on_scan_complete(event));
    }

    fn on_scan_error(&self, event: &ScanErrorEvent) {
        self.emit(|h| h.on_scan_error(event));
    }
}
