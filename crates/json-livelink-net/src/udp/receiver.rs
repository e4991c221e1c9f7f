//! Dedicated receive thread for a bound UDP socket.
//!
//! The thread does exactly four things: wait for readability, read, copy, and
//! hand the copy to a caller-supplied sink. It never interprets payloads, so a
//! slow consumer cannot back up the kernel socket buffer.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use json_livelink_core::CancellationToken;
use json_livelink_core::logging::{span_names, targets};
use mio::net::UdpSocket as MioUdpSocket;
use mio::{Events, Interest, Poll, Token};
use parking_lot::Mutex;

use super::config::{Datagram, Endpoint, ReceiverConfig};
use super::state::ReceiverState;
use crate::Result;
use crate::error::NetworkError;

/// Index appended to receive thread names.
static NEXT_THREAD_INDEX: AtomicU64 = AtomicU64::new(0);

const SOCKET_TOKEN: Token = Token(0);

/// Owner handle for a running receive thread.
///
/// The socket moves into the thread when it is spawned and comes back out
/// through the join handle, so it is closed only after the thread has exited.
///
/// # Example
///
/// ```no_run
/// use json_livelink_core::CancellationToken;
/// use json_livelink_net::udp::{bind_endpoint, DatagramReceiver, Endpoint, ReceiverConfig};
///
/// let config = ReceiverConfig::new(Endpoint::localhost(54321));
/// let socket = bind_endpoint(&config)?;
///
/// let receiver = DatagramReceiver::spawn(socket, &config, CancellationToken::new(), |datagram| {
///     println!("{} bytes from {}", datagram.payload.len(), datagram.sender);
/// })?;
///
/// // Blocks until the thread has exited and the socket is closed.
/// receiver.stop();
/// # Ok::<(), json_livelink_net::NetworkError>(())
/// ```
pub struct DatagramReceiver {
    endpoint: Endpoint,
    local_addr: SocketAddr,
    thread_name: String,
    state: Mutex<ReceiverState>,
    cancellation: CancellationToken,
    handle: Mutex<Option<JoinHandle<MioUdpSocket>>>,
}

impl DatagramReceiver {
    /// Start draining `socket` on a new thread.
    ///
    /// Every datagram of more than zero bytes is copied out of the reusable
    /// receive buffer and passed to `on_datagram` on the receive thread, in
    /// read order. `cancellation` stops the thread; it is checked before every
    /// wait and before every read.
    pub fn spawn<F>(
        socket: std::net::UdpSocket,
        config: &ReceiverConfig,
        cancellation: CancellationToken,
        on_datagram: F,
    ) -> Result<Self>
    where
        F: FnMut(Datagram) + Send + 'static,
    {
        let endpoint = config.endpoint;
        let local_addr = socket
            .local_addr()
            .map_err(NetworkError::option(endpoint, "query local address"))?;

        let mut socket = MioUdpSocket::from_std(socket);
        let poll = Poll::new().map_err(NetworkError::Poll)?;
        poll.registry()
            .register(&mut socket, SOCKET_TOKEN, Interest::READABLE)
            .map_err(NetworkError::Poll)?;

        let thread_name = format!(
            "{} {}",
            config.thread_name_prefix,
            NEXT_THREAD_INDEX.fetch_add(1, Ordering::Relaxed)
        );

        let receive_loop = ReceiveLoop {
            endpoint,
            socket,
            poll,
            events: Events::with_capacity(4),
            buffer: vec![0u8; config.max_datagram_size.max(1)],
            wait_timeout: config.wait_timeout,
            cancellation: cancellation.clone(),
            on_datagram,
        };

        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .stack_size(config.thread_stack_size)
            .spawn(move || receive_loop.run())
            .map_err(|source| NetworkError::Spawn {
                name: thread_name.clone(),
                source,
            })?;

        tracing::info!(
            target: targets::RECEIVE,
            %endpoint,
            %local_addr,
            thread = %thread_name,
            "receive thread started"
        );

        Ok(Self {
            endpoint,
            local_addr,
            thread_name,
            state: Mutex::new(ReceiverState::Receiving),
            cancellation,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Get the current receiver state.
    pub fn state(&self) -> ReceiverState {
        *self.state.lock()
    }

    /// Check if the thread is live and has not been asked to stop.
    pub fn is_running(&self) -> bool {
        !self.cancellation.is_cancelled()
            && self
                .handle
                .lock()
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// The endpoint this receiver serves.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// The address the socket is actually bound to.
    ///
    /// Differs from the endpoint when binding port 0 or a multicast group.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The receive thread's name.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// The token shared with the receive thread.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Ask the thread to stop without waiting for it.
    ///
    /// A read already in progress completes; no new read starts.
    pub fn request_stop(&self) {
        if self.cancellation.cancel() {
            tracing::info!(target: targets::RECEIVE, endpoint = %self.endpoint, "stop requested");
        }
        let mut state = self.state.lock();
        if *state == ReceiverState::Receiving {
            *state = ReceiverState::Stopping;
        }
    }

    /// Stop the thread and wait for it to exit, then close the socket.
    ///
    /// Returns `true` if this call joined the thread cleanly, `false` if it
    /// was already joined or the thread panicked.
    pub fn stop(&self) -> bool {
        self.request_stop();

        let handle = self.handle.lock().take();
        let joined = match handle {
            Some(handle) => match handle.join() {
                Ok(socket) => {
                    drop(socket);
                    true
                }
                Err(_) => {
                    tracing::error!(
                        target: targets::RECEIVE,
                        thread = %self.thread_name,
                        "receive thread panicked"
                    );
                    false
                }
            },
            None => false,
        };

        *self.state.lock() = ReceiverState::Stopped;
        if joined {
            tracing::info!(target: targets::RECEIVE, endpoint = %self.endpoint, "receive thread stopped");
        }
        joined
    }
}

impl Drop for DatagramReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for DatagramReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatagramReceiver")
            .field("endpoint", &self.endpoint)
            .field("local_addr", &self.local_addr)
            .field("thread_name", &self.thread_name)
            .field("state", &self.state())
            .finish()
    }
}

/// State owned by the receive thread.
struct ReceiveLoop<F> {
    endpoint: Endpoint,
    socket: MioUdpSocket,
    poll: Poll,
    events: Events,
    buffer: Vec<u8>,
    wait_timeout: Duration,
    cancellation: CancellationToken,
    on_datagram: F,
}

impl<F: FnMut(Datagram)> ReceiveLoop<F> {
    fn run(mut self) -> MioUdpSocket {
        let span = tracing::debug_span!(
            target: targets::RECEIVE,
            span_names::RECEIVE_LOOP,
            endpoint = %self.endpoint
        );
        let _entered = span.enter();

        // Readiness is edge-triggered; after a failed read the socket may
        // still hold data without a fresh event, so drain again next pass.
        let mut retry_drain = false;

        while !self.cancellation.is_cancelled() {
            match self.poll.poll(&mut self.events, Some(self.wait_timeout)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(target: targets::RECEIVE, error = %e, "readiness wait failed");
                    thread::sleep(self.wait_timeout);
                    continue;
                }
            }

            if self.events.is_empty() && !retry_drain {
                continue;
            }
            retry_drain = !self.drain();
        }

        self.socket
    }

    /// Read until the socket would block. Returns `false` if a read failed.
    fn drain(&mut self) -> bool {
        while !self.cancellation.is_cancelled() {
            match self.socket.recv_from(&mut self.buffer) {
                Ok((0, _)) => {}
                Ok((read, sender)) => {
                    tracing::trace!(target: targets::RECEIVE, bytes = read, %sender, "datagram received");
                    (self.on_datagram)(Datagram::copy_from(&self.buffer[..read], sender));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return true,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::trace!(target: targets::RECEIVE, error = %e, "read failed, skipping");
                    return false;
                }
            }
        }
        true
    }
}
