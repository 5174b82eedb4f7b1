//! # StopToken Module
//!
//! Cooperative cancellation for the background streaming loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellable stop signal shared with the background streaming thread.
///
/// The perpetual streaming loop observes the token once per iteration and exits
/// after finishing the iteration in flight, so cancellation latency is bounded
/// by one cycle's worth of load/evict work. Requesting a stop is idempotent and
/// cannot be undone; a manager that has been stopped must be rebuilt, not
/// restarted.
///
/// # Examples
///
/// ```
/// use voxel_streaming::core::StopToken;
///
/// let token = StopToken::new();
/// let observer = token.clone();
///
/// assert!(!observer.should_stop());
/// token.request_stop();
/// assert!(observer.should_stop());
/// ```
#[derive(Clone, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    /// Creates a token in the running (not stopped) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals every clone of this token to stop.
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Returns `true` once any clone has requested a stop.
    pub fn should_stop(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_visible_through_clones() {
        let token = StopToken::new();
        let clone = token.clone();

        assert!(!token.should_stop());
        clone.request_stop();
        assert!(token.should_stop());
        assert!(clone.should_stop());
    }
}
