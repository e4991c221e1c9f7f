//! Core systems for JSON Live Link.
//!
//! This crate provides the pieces shared by the networking and decoding
//! layers:
//!
//! - **Hand-off Queue**: [`Dispatcher`]/[`ConsumerQueue`] move work from
//!   network threads onto a single consumer context
//! - **Cancellation**: [`CancellationToken`], the stop flag shared between a
//!   receive thread and its owner
//! - **Logging**: tracing targets and span names for every subsystem
//!
//! # Hand-off Example
//!
//! ```
//! use json_livelink_core::ConsumerQueue;
//!
//! let queue = ConsumerQueue::<Vec<u8>>::new();
//! let dispatcher = queue.dispatcher();
//!
//! // Any thread may post
//! dispatcher.post(b"{}".to_vec()).unwrap();
//!
//! // The owner drains, usually once per host update
//! let processed = queue.process_all(|bytes| assert_eq!(bytes, b"{}"));
//! assert_eq!(processed, 1);
//! ```

mod cancel;
pub mod dispatch;
mod error;
pub mod logging;

pub use cancel::CancellationToken;
pub use dispatch::{ConsumerQueue, Dispatcher};
pub use error::{DispatchError, Result};
