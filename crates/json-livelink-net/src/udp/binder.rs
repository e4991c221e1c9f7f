//! Endpoint binding.
//!
//! Turns an [`Endpoint`] into a bound, non-blocking datagram socket. Unicast
//! endpoints bind their own address; multicast endpoints bind the wildcard
//! address on the same port and join the group.

use std::net::{Ipv4Addr, SocketAddr};

use json_livelink_core::logging::targets;
use socket2::{Domain, Protocol, Socket, Type};

use super::config::{Endpoint, ReceiverConfig};
use crate::Result;
use crate::error::NetworkError;

/// Bind a UDP socket for the configured endpoint.
///
/// The socket is non-blocking, address-reusable and has its kernel receive
/// buffer sized to [`ReceiverConfig::recv_buffer_size`].
pub fn bind_endpoint(config: &ReceiverConfig) -> Result<std::net::UdpSocket> {
    let endpoint = config.endpoint;

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(NetworkError::option(endpoint, "create socket"))?;
    socket
        .set_nonblocking(true)
        .map_err(NetworkError::option(endpoint, "set non-blocking"))?;
    socket
        .set_reuse_address(true)
        .map_err(NetworkError::option(endpoint, "enable address reuse"))?;
    socket
        .set_recv_buffer_size(config.recv_buffer_size)
        .map_err(NetworkError::option(endpoint, "set receive buffer size"))?;

    if endpoint.is_multicast() {
        bind_multicast(&socket, endpoint, config)?;
    } else {
        bind_to(&socket, endpoint.socket_addr(), endpoint)?;
    }

    if !matches!(socket.r#type(), Ok(ty) if ty == Type::DGRAM) {
        return Err(NetworkError::WrongSocketType(endpoint));
    }

    tracing::debug!(
        target: targets::BIND,
        %endpoint,
        multicast = endpoint.is_multicast(),
        recv_buffer_size = config.recv_buffer_size,
        "socket bound"
    );

    Ok(socket.into())
}

fn bind_multicast(socket: &Socket, endpoint: Endpoint, config: &ReceiverConfig) -> Result<()> {
    let group = endpoint.address();
    bind_to(
        socket,
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, endpoint.port())),
        endpoint,
    )?;
    socket
        .join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)
        .map_err(|source| NetworkError::JoinMulticast { group, source })?;
    socket
        .set_multicast_loop_v4(config.multicast.loopback)
        .map_err(NetworkError::option(endpoint, "set multicast loopback"))?;
    socket
        .set_multicast_ttl_v4(config.multicast.ttl)
        .map_err(NetworkError::option(endpoint, "set multicast TTL"))?;
    Ok(())
}

fn bind_to(socket: &Socket, addr: SocketAddr, endpoint: Endpoint) -> Result<()> {
    socket
        .bind(&addr.into())
        .map_err(|source| NetworkError::Bind { endpoint, source })
}
