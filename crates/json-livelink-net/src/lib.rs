//! Networking module for JSON Live Link.
//!
//! This crate owns everything that touches a socket:
//!
//! - **Endpoint Binding**: unicast and multicast UDP sockets with a large
//!   receive buffer and address reuse
//! - **Receive Thread**: a dedicated thread per endpoint that waits for
//!   readability with a bounded timeout, drains every pending datagram and
//!   hands an owned copy of each to the caller
//!
//! Nothing here parses payloads. Decoding happens on the consumer context, see
//! the `json-livelink` crate.
//!
//! # Lifecycle
//!
//! A [`DatagramReceiver`](udp::DatagramReceiver) moves through
//! `Created → Receiving → Stopping → Stopped`. Stopping is cooperative: the
//! thread notices the cancellation token within one wait timeout, exits, and
//! only then is its socket closed.

mod error;
pub mod udp;

pub use error::{NetworkError, Result};

// Re-export commonly used types at the crate root
pub use udp::{
    Datagram, DatagramReceiver, Endpoint, MulticastConfig, ReceiverConfig, ReceiverState,
    bind_endpoint,
};
