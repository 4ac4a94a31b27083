//! Progress reporting for long-running operations
//!
//! A background job bumps the counter while the UI thread reads it to draw
//! the status line.
//!
//! # Example
//! ```ignore
//! let progress = app.start_progress("Exporting", page_count);
//! pages.par_iter().for_each(|page| {
//!     // render...
//!     progress.inc();
//! });
//! app.clear_progress();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Progress tracker shared between a worker and the UI
#[derive(Clone, Debug)]
pub struct Progress {
    current: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            current: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
        }
    }

    /// Increment progress by 1 (thread-safe)
    #[inline]
    pub fn inc(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Get progress as a percentage (0-100)
    pub fn percent(&self) -> usize {
        let total = self.total();
        if total == 0 {
            return 100;
        }
        (self.current().min(total) * 100) / total
    }

    /// Format progress for display
    pub fn format(&self, operation: &str) -> String {
        let pct = self.percent();
        if pct >= 100 {
            format!("{}: done", operation)
        } else {
            format!("{}: {}%", operation, pct)
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0)
    }
}
