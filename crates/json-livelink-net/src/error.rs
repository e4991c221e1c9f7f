//! Error types for the networking module.

use std::net::Ipv4Addr;

use crate::udp::Endpoint;

/// Network-specific errors.
///
/// All of these are setup failures: once a receive thread is running, read
/// errors are skipped rather than surfaced.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The endpoint string could not be parsed.
    #[error("Invalid endpoint '{0}': expected a.b.c.d:port")]
    InvalidEndpoint(String),

    /// Creating the socket or applying an option failed.
    #[error("Failed to {operation} on socket for {endpoint}: {source}")]
    SocketOption {
        endpoint: Endpoint,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Binding to the endpoint failed.
    #[error("Failed to bind {endpoint}: {source}")]
    Bind {
        endpoint: Endpoint,
        #[source]
        source: std::io::Error,
    },

    /// Joining the multicast group failed.
    #[error("Failed to join multicast group {group}: {source}")]
    JoinMulticast {
        group: Ipv4Addr,
        #[source]
        source: std::io::Error,
    },

    /// The constructed socket is not a datagram socket.
    #[error("Socket for {0} is not a datagram socket")]
    WrongSocketType(Endpoint),

    /// The readiness poller could not be created or registered.
    #[error("Failed to set up readiness polling: {0}")]
    Poll(#[source] std::io::Error),

    /// The receive thread could not be spawned.
    #[error("Failed to spawn receive thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl NetworkError {
    pub(crate) fn option(
        endpoint: Endpoint,
        operation: &'static str,
    ) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::SocketOption {
            endpoint,
            operation,
            source,
        }
    }
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
