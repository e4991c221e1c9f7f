//! UDP endpoint binding and the receive thread.
//!
//! This module provides the network half of a live feed:
//! - **bind_endpoint**: builds a non-blocking, reusable socket for an
//!   [`Endpoint`], joining the group when the endpoint is multicast
//! - **DatagramReceiver**: a dedicated thread that drains the socket and hands
//!   each datagram to a sink
//!
//! # Example
//!
//! ```ignore
//! use json_livelink_core::{CancellationToken, ConsumerQueue};
//! use json_livelink_net::udp::{bind_endpoint, DatagramReceiver, ReceiverConfig};
//!
//! let config = ReceiverConfig::new("127.0.0.1:54321".parse::<Endpoint>()?);
//! let socket = bind_endpoint(&config)?;
//!
//! let queue = ConsumerQueue::new();
//! let dispatcher = queue.dispatcher();
//! let receiver = DatagramReceiver::spawn(socket, &config, CancellationToken::new(), move |datagram| {
//!     let _ = dispatcher.post(datagram);
//! })?;
//!
//! // On the consumer side
//! queue.process_all(|datagram| println!("{} bytes", datagram.payload.len()));
//! ```
//!
//! # Multicast Example
//!
//! ```ignore
//! use json_livelink_net::udp::{MulticastConfig, ReceiverConfig};
//!
//! let config = ReceiverConfig::new("239.255.0.1:5000".parse::<Endpoint>()?)
//!     .multicast_config(MulticastConfig::new().loopback(true).ttl(2));
//! let socket = bind_endpoint(&config)?;
//! ```

mod binder;
mod config;
mod receiver;
mod state;

pub use binder::bind_endpoint;
pub use config::{
    DEFAULT_MAX_DATAGRAM_SIZE, DEFAULT_RECV_BUFFER_SIZE, DEFAULT_THREAD_STACK_SIZE,
    DEFAULT_WAIT_TIMEOUT, Datagram, Endpoint, MulticastConfig, ReceiverConfig,
};
pub use receiver::DatagramReceiver;
pub use state::ReceiverState;
