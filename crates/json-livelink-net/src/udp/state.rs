//! State enumeration for the UDP receiver.

/// Lifecycle of a receive thread.
///
/// Transitions only move forward:
/// `Created → Receiving → Stopping → Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReceiverState {
    /// Socket bound, thread not yet started.
    #[default]
    Created,
    /// The thread is draining the socket.
    Receiving,
    /// Shutdown requested; the thread may still be finishing a read.
    Stopping,
    /// The thread has been joined and the socket released.
    Stopped,
}

impl ReceiverState {
    /// Whether the thread may still touch the socket.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Receiving | Self::Stopping)
    }
}

impl std::fmt::Display for ReceiverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiverState::Created => write!(f, "Created"),
            ReceiverState::Receiving => write!(f, "Receiving"),
            ReceiverState::Stopping => write!(f, "Stopping"),
            ReceiverState::Stopped => write!(f, "Stopped"),
        }
    }
}
