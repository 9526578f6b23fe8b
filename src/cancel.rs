use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag used to abort a running evaluation from another thread.
///
/// Clones share the same flag. The evaluator polls it between playouts, so cancellation
/// takes effect within one playout per worker.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clears the flag so the token can be reused for the next decision.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}
