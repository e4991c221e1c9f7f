//! Source configuration.

use json_livelink_net::{Endpoint, ReceiverConfig};

/// What the decoder does after a subject's payload fails to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedFieldPolicy {
    /// Stop processing the datagram. Later fields are not looked at.
    #[default]
    AbortDatagram,
    /// Skip the failing field and carry on with the next one.
    SkipField,
}

/// Configuration for a [`LiveLinkSource`](crate::LiveLinkSource).
#[derive(Clone, Debug, Default)]
pub struct SourceConfig {
    /// Endpoint and receive thread settings.
    pub receiver: ReceiverConfig,
    /// Handling of malformed subject payloads.
    pub malformed_field: MalformedFieldPolicy,
}

impl SourceConfig {
    /// Create a configuration for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<Endpoint>) -> Self {
        Self {
            receiver: ReceiverConfig::new(endpoint),
            ..Default::default()
        }
    }

    /// The endpoint this source listens on.
    pub fn endpoint(&self) -> Endpoint {
        self.receiver.endpoint
    }

    /// Replace the receiver configuration.
    pub fn receiver_config(mut self, receiver: ReceiverConfig) -> Self {
        self.receiver = receiver;
        self
    }

    /// Set the malformed field policy.
    pub fn malformed_field_policy(mut self, policy: MalformedFieldPolicy) -> Self {
        self.malformed_field = policy;
        self
    }
}
