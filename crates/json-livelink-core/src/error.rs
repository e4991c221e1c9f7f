//! Error types for JSON Live Link core.

/// Errors raised when handing work to the consumer context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The consumer queue has been dropped; nothing will drain the item.
    #[error("consumer queue has been dropped")]
    Disconnected,
}

/// A specialized Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
