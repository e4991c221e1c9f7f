//! Configuration types for the UDP receiver.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;

use crate::error::NetworkError;

/// Default receive buffer size: 1 MiB, large enough to absorb bursts.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1024 * 1024;

/// Default read buffer size: the largest possible UDP payload.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// Default bounded wait for read readiness.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Default stack size for the receive thread.
pub const DEFAULT_THREAD_STACK_SIZE: usize = 128 * 1024;

/// An IPv4 address and port identifying one physical feed.
///
/// The string form (`a.b.c.d:port`) is what scopes subject names to this
/// feed, so it must stay stable for the lifetime of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint(SocketAddrV4);

impl Endpoint {
    /// Create an endpoint from an address and port.
    pub const fn new(address: Ipv4Addr, port: u16) -> Self {
        Self(SocketAddrV4::new(address, port))
    }

    /// Create a loopback endpoint on the given port.
    pub const fn localhost(port: u16) -> Self {
        Self::new(Ipv4Addr::LOCALHOST, port)
    }

    /// The IPv4 address.
    pub const fn address(&self) -> Ipv4Addr {
        *self.0.ip()
    }

    /// The port.
    pub const fn port(&self) -> u16 {
        self.0.port()
    }

    /// Whether the address is in the IPv4 multicast range.
    pub const fn is_multicast(&self) -> bool {
        self.0.ip().is_multicast()
    }

    /// The endpoint as a socket address.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(self.0)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::localhost(54321)
    }
}

impl From<SocketAddrV4> for Endpoint {
    fn from(addr: SocketAddrV4) -> Self {
        Self(addr)
    }
}

impl From<(Ipv4Addr, u16)> for Endpoint {
    fn from((address, port): (Ipv4Addr, u16)) -> Self {
        Self::new(address, port)
    }
}

impl FromStr for Endpoint {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<SocketAddrV4>()
            .map(Self)
            .map_err(|_| NetworkError::InvalidEndpoint(s.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.ip(), self.0.port())
    }
}

/// Socket options applied when the endpoint is a multicast group.
#[derive(Clone, Debug)]
pub struct MulticastConfig {
    /// Whether to receive our own multicast messages.
    pub loopback: bool,
    /// TTL for multicast packets. Small values keep traffic near the host.
    pub ttl: u32,
}

impl Default for MulticastConfig {
    fn default() -> Self {
        Self {
            loopback: true,
            ttl: 2,
        }
    }
}

impl MulticastConfig {
    /// Create the default multicast configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable multicast loopback.
    pub fn loopback(mut self, enabled: bool) -> Self {
        self.loopback = enabled;
        self
    }

    /// Set the multicast TTL.
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Configuration for a bound endpoint and its receive thread.
#[derive(Clone, Debug)]
pub struct ReceiverConfig {
    /// The feed to listen on.
    pub endpoint: Endpoint,
    /// Kernel receive buffer size (`SO_RCVBUF`).
    pub recv_buffer_size: usize,
    /// Size of the reusable read buffer. Longer datagrams are truncated.
    pub max_datagram_size: usize,
    /// Upper bound on each wait for readability. Shutdown is observed within
    /// one interval.
    pub wait_timeout: Duration,
    /// Options used when the endpoint is a multicast group.
    pub multicast: MulticastConfig,
    /// Receive threads are named `"<prefix> <n>"`.
    pub thread_name_prefix: String,
    /// Stack size for the receive thread in bytes.
    pub thread_stack_size: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            multicast: MulticastConfig::default(),
            thread_name_prefix: "JSON UDP Receiver".into(),
            thread_stack_size: DEFAULT_THREAD_STACK_SIZE,
        }
    }
}

impl ReceiverConfig {
    /// Create a configuration listening on the given endpoint.
    pub fn new(endpoint: impl Into<Endpoint>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the kernel receive buffer size.
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size;
        self
    }

    /// Set the read buffer size, the longest datagram delivered whole.
    pub fn max_datagram_size(mut self, size: usize) -> Self {
        self.max_datagram_size = size;
        self
    }

    /// Set the readiness wait timeout.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Set multicast configuration.
    pub fn multicast_config(mut self, config: MulticastConfig) -> Self {
        self.multicast = config;
        self
    }

    /// Set the receive thread name prefix.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the receive thread stack size.
    pub fn thread_stack_size(mut self, size: usize) -> Self {
        self.thread_stack_size = size;
        self
    }
}

/// A received datagram with its source address.
///
/// The payload is an owned copy of the bytes read; later reads into the
/// receive buffer cannot affect it.
#[derive(Clone, Debug)]
pub struct Datagram {
    /// The datagram payload.
    pub payload: Bytes,
    /// The sender of the datagram.
    pub sender: SocketAddr,
}

impl Datagram {
    /// Create a new datagram by copying `data`.
    pub fn copy_from(data: &[u8], sender: SocketAddr) -> Self {
        Self {
            payload: Bytes::copy_from_slice(data),
            sender,
        }
    }
}
