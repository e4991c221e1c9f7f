//! Hand-off queue between producer threads and a single consumer context.
//!
//! Producers hold a cloneable [`Dispatcher`] and post items from any thread.
//! The consumer owns the [`ConsumerQueue`] and drains it from its own loop,
//! typically once per host update. Items posted by one producer are delivered
//! in the order they were posted.
//!
//! # Example
//!
//! ```
//! use json_livelink_core::dispatch::ConsumerQueue;
//!
//! let queue = ConsumerQueue::<u32>::new();
//! let dispatcher = queue.dispatcher();
//!
//! std::thread::spawn(move || {
//!     dispatcher.post(1).unwrap();
//!     dispatcher.post(2).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut seen = Vec::new();
//! queue.process_all(|item| seen.push(item));
//! assert_eq!(seen, vec![1, 2]);
//! ```

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};

use crate::error::DispatchError;

/// Default number of items handled per [`ConsumerQueue::process_batch`] call.
const DEFAULT_BATCH_SIZE: usize = 64;

/// Producer side of the hand-off queue.
///
/// Cheap to clone; every clone feeds the same consumer.
pub struct Dispatcher<T> {
    sender: Sender<T>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send> Dispatcher<T> {
    /// Post an item to the consumer.
    ///
    /// Never blocks. Fails only once the consumer queue has been dropped.
    pub fn post(&self, item: T) -> Result<(), DispatchError> {
        self.sender
            .send(item)
            .map_err(|_| DispatchError::Disconnected)
    }

    /// Number of items waiting on the consumer side.
    pub fn pending_count(&self) -> usize {
        self.sender.len()
    }
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.sender.len())
            .finish()
    }
}

/// Consumer side of the hand-off queue.
///
/// Only the owner drains the queue, so whatever state the handler closes over
/// is touched from a single execution context.
pub struct ConsumerQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    batch_size: usize,
}

impl<T: Send> ConsumerQueue<T> {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    /// Create a new queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            batch_size: batch_size.max(1),
        }
    }

    /// Get a producer handle for this queue.
    pub fn dispatcher(&self) -> Dispatcher<T> {
        Dispatcher {
            sender: self.sender.clone(),
        }
    }

    /// Check if there are any pending items.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Get the number of pending items.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Set the batch size used by [`process_batch`](Self::process_batch).
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }

    /// Process up to `batch_size` items.
    ///
    /// Returns the number of items processed.
    pub fn process_batch(&self, handler: impl FnMut(T)) -> usize {
        self.drain(self.batch_size, handler)
    }

    /// Process every item that was pending when the call started.
    ///
    /// Items posted while the handler runs are left for the next call, so a
    /// fast producer cannot keep the consumer here forever.
    ///
    /// Returns the number of items processed.
    pub fn process_all(&self, handler: impl FnMut(T)) -> usize {
        self.drain(self.receiver.len(), handler)
    }

    /// Block for up to `timeout` until an item arrives, then process it and
    /// everything else already pending.
    ///
    /// Returns the number of items processed, `0` on timeout.
    pub fn wait_and_process(&self, timeout: Duration, mut handler: impl FnMut(T)) -> usize {
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => {
                handler(item);
                1 + self.process_all(handler)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    fn drain(&self, limit: usize, mut handler: impl FnMut(T)) -> usize {
        let mut count = 0;
        while count < limit {
            match self.receiver.try_recv() {
                Ok(item) => {
                    handler(item);
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if count > 0 {
            tracing::trace!(target: crate::logging::targets::DISPATCH, count, "processed queued items");
        }
        count
    }
}

impl<T: Send> Default for ConsumerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ConsumerQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerQueue")
            .field("pending", &self.receiver.len())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

static_assertions::assert_impl_all!(Dispatcher<Vec<u8>>: Send, Sync, Clone);
static_assertions::assert_impl_all!(ConsumerQueue<Vec<u8>>: Send);
