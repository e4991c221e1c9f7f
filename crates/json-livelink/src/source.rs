//! A live link source: one endpoint, one receive thread.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use json_livelink_core::logging::targets;
use json_livelink_core::{CancellationToken, Dispatcher};
use json_livelink_net::{
    DatagramReceiver, Endpoint, NetworkError, ReceiverState, bind_endpoint,
};

use crate::config::SourceConfig;
use crate::context::Handoff;
use crate::subject::SourceId;

/// Text reported as the source type.
pub const SOURCE_TYPE: &str = "ZT_LiveLink";

/// Text reported as the source machine name.
pub const MACHINE_NAME: &str = "localhost";

/// Externally visible status of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// The endpoint could not be bound; nothing is received.
    DeviceNotFound,
    /// Socket and thread are live.
    Receiving,
    /// The source has been shut down.
    Stopped,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::DeviceNotFound => write!(f, "Device Not Found"),
            SourceStatus::Receiving => write!(f, "Receiving"),
            SourceStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

/// A bound endpoint and its receive thread.
///
/// Created through [`ConsumerContext::create_source`](crate::ConsumerContext::create_source).
/// Datagrams it receives are posted to that context. Dropping the source
/// shuts it down.
pub struct LiveLinkSource {
    id: SourceId,
    endpoint: Endpoint,
    receiver: Option<DatagramReceiver>,
    stopping: CancellationToken,
    dispatcher: Dispatcher<Handoff>,
    setup_error: Option<NetworkError>,
    detached: AtomicBool,
}

impl LiveLinkSource {
    pub(crate) fn start(
        id: SourceId,
        config: &SourceConfig,
        dispatcher: Dispatcher<Handoff>,
        stopping: CancellationToken,
    ) -> Self {
        let endpoint = config.endpoint();
        let (receiver, setup_error) = match spawn_receiver(id, config, &dispatcher, &stopping) {
            Ok(receiver) => {
                tracing::info!(target: targets::SOURCE, %id, %endpoint, "source receiving");
                (Some(receiver), None)
            }
            Err(error) => {
                tracing::warn!(target: targets::SOURCE, %id, %endpoint, %error, "device not found");
                (None, Some(error))
            }
        };

        Self {
            id,
            endpoint,
            receiver,
            stopping,
            dispatcher,
            setup_error,
            detached: AtomicBool::new(false),
        }
    }

    /// This source's identifier.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// The address actually bound, if setup succeeded.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.receiver.as_ref().map(DatagramReceiver::local_addr)
    }

    /// The receive thread state, if setup succeeded.
    pub fn state(&self) -> Option<ReceiverState> {
        self.receiver.as_ref().map(DatagramReceiver::state)
    }

    /// Why setup failed, if it did.
    pub fn setup_error(&self) -> Option<&NetworkError> {
        self.setup_error.as_ref()
    }

    /// Current status.
    pub fn status(&self) -> SourceStatus {
        match &self.receiver {
            None => SourceStatus::DeviceNotFound,
            Some(receiver) if receiver.state() == ReceiverState::Stopped => SourceStatus::Stopped,
            Some(_) => SourceStatus::Receiving,
        }
    }

    /// The source type text.
    pub fn source_type(&self) -> &'static str {
        SOURCE_TYPE
    }

    /// The source machine name text.
    pub fn machine_name(&self) -> &'static str {
        MACHINE_NAME
    }

    /// Whether the source is still delivering: not stopping, with a live
    /// thread and socket.
    pub fn is_source_still_valid(&self) -> bool {
        !self.stopping.is_cancelled()
            && self.receiver.as_ref().is_some_and(DatagramReceiver::is_running)
    }

    /// Stop receiving and release the thread and socket.
    ///
    /// Blocks until the receive thread has exited. Frames still queued for
    /// this source are not published. Returns `true` once shutdown has
    /// completed, including when it had already completed earlier.
    pub fn request_shutdown(&self) -> bool {
        self.stopping.cancel();
        if let Some(receiver) = &self.receiver {
            receiver.stop();
        }

        if !self.detached.swap(true, Ordering::AcqRel) {
            // Queued behind every datagram this source posted.
            if self.dispatcher.post(Handoff::Detach { source: self.id }).is_err() {
                tracing::trace!(target: targets::SOURCE, id = %self.id, "consumer context gone");
            }
            tracing::info!(target: targets::SOURCE, id = %self.id, endpoint = %self.endpoint, "source shut down");
        }
        true
    }
}

impl Drop for LiveLinkSource {
    fn drop(&mut self) {
        self.request_shutdown();
    }
}

impl fmt::Debug for LiveLinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveLinkSource")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("status", &self.status())
            .field("local_addr", &self.local_addr())
            .finish()
    }
}

fn spawn_receiver(
    id: SourceId,
    config: &SourceConfig,
    dispatcher: &Dispatcher<Handoff>,
    stopping: &CancellationToken,
) -> json_livelink_net::Result<DatagramReceiver> {
    let socket = bind_endpoint(&config.receiver)?;
    let dispatcher = dispatcher.clone();

    DatagramReceiver::spawn(socket, &config.receiver, stopping.clone(), move |datagram| {
        let handoff = Handoff::Datagram {
            source: id,
            payload: datagram.payload,
        };
        if dispatcher.post(handoff).is_err() {
            tracing::trace!(target: targets::RECEIVE, %id, "consumer context gone, datagram dropped");
        }
    })
}

static_assertions::assert_impl_all!(LiveLinkSource: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(SourceStatus::DeviceNotFound.to_string(), "Device Not Found");
        assert_eq!(SourceStatus::Receiving.to_string(), "Receiving");
        assert_eq!(SourceStatus::Stopped.to_string(), "Stopped");
    }

    #[test]
    fn test_metadata_text() {
        assert_eq!(SOURCE_TYPE, "ZT_LiveLink");
        assert_eq!(MACHINE_NAME, "localhost");
    }
}
