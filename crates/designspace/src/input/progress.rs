//! Progress reporting and cooperative cancellation for long imports.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives progress of an import or update and may ask it to stop.
///
/// Cancellation is checked between rows. A cancelled operation leaves the
/// data sheet exactly as it was before the call.
pub trait ProgressMonitor {
    /// Called once with the number of rows to process.
    fn start(&mut self, _total_rows: usize) {}

    /// Called after each processed row.
    fn advance(&mut self, _rows_done: usize) {}

    /// Whether the operation should stop.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A monitor that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressMonitor for NoProgress {}

/// A shareable cancellation flag, e.g. set from a Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Clear a previous request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl ProgressMonitor for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.is_set()
    }
}
