//! Error types for datagram decoding and payload mapping.

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that discard a whole datagram.
///
/// These never reach the network thread; the consumer context logs them at
/// debug level and moves on.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("Datagram is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The payload is JSON but not an object keyed by subject name.
    #[error("Datagram top level is a {found}, expected an object")]
    NotAnObject { found: &'static str },
}

/// Errors that reject one subject's payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// The subject's value is not a JSON object.
    #[error("Subject value is a {found}, expected an object")]
    NotAnObject { found: &'static str },

    /// The `UserData` field is absent.
    #[error("Missing 'UserData' field")]
    MissingUserData,

    /// The `UserData` field is not an array.
    #[error("'UserData' is a {found}, expected an array")]
    UserDataNotArray { found: &'static str },

    /// The `UserData` array has the wrong number of entries.
    #[error("'UserData' has {actual} entries, expected {expected}")]
    WrongArity { expected: usize, actual: usize },

    /// An entry of `UserData` is not a number.
    #[error("'UserData[{index}]' is not a number")]
    NonNumeric { index: usize },
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
