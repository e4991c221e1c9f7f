//! Cooperative cancellation shared between a network thread and its owner.
//!
//! A [`CancellationToken`] is the only piece of state the receive thread and
//! the consumer context both read. The owner calls [`cancel`] once; every
//! holder observes it on its next check.
//!
//! ```
//! use json_livelink_core::CancellationToken;
//!
//! let token = CancellationToken::new();
//! let worker_token = token.clone();
//!
//! let handle = std::thread::spawn(move || {
//!     let mut spins = 0u64;
//!     while !worker_token.is_cancelled() {
//!         spins += 1;
//!         std::thread::yield_now();
//!     }
//!     spins
//! });
//!
//! token.cancel();
//! handle.join().unwrap();
//! assert!(token.is_cancelled());
//! ```
//!
//! [`cancel`]: CancellationToken::cancel

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable, one-way cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }
}
