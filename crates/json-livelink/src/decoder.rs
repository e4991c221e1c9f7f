//! Datagram decoding: JSON object in, registrations and frames out.

use json_livelink_core::CancellationToken;
use json_livelink_core::logging::{span_names, targets};
use json_livelink_net::Endpoint;
use serde_json::Value;

use crate::config::MalformedFieldPolicy;
use crate::error::{DecodeError, Result, kind_of};
use crate::mapper::PayloadMapper;
use crate::publisher::Publisher;
use crate::subject::{SourceId, SubjectKey, SubjectName, SubjectRegistry};

/// What one datagram produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOutcome {
    /// Subjects seen for the first time and registered.
    pub registered: usize,
    /// Frames handed to the publisher.
    pub published: usize,
    /// Frames mapped but withheld because the source is stopping.
    pub suppressed: usize,
    /// Fields whose payload failed to map.
    pub malformed: usize,
    /// Index of the field that ended processing early, if any.
    pub aborted_at: Option<usize>,
    /// Fields after `aborted_at` that were not looked at.
    pub skipped: usize,
}

impl DecodeOutcome {
    /// Whether processing stopped before the last field.
    pub fn was_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }
}

/// Decodes the datagrams of one source.
///
/// Owns that source's subject registry. Runs only on the consumer context,
/// so registration and publishing never race each other.
pub struct PacketDecoder {
    source: SourceId,
    endpoint: Endpoint,
    registry: SubjectRegistry,
    mapper: Box<dyn PayloadMapper>,
    policy: MalformedFieldPolicy,
    stopping: CancellationToken,
}

impl PacketDecoder {
    /// Create a decoder for a source.
    ///
    /// `stopping` is the source's stop flag. Once it is set, frames are no
    /// longer published, though first-sight registration still happens.
    pub fn new(
        source: SourceId,
        endpoint: Endpoint,
        mapper: Box<dyn PayloadMapper>,
        policy: MalformedFieldPolicy,
        stopping: CancellationToken,
    ) -> Self {
        Self {
            source,
            endpoint,
            registry: SubjectRegistry::new(),
            mapper,
            policy,
            stopping,
        }
    }

    /// The source this decoder serves.
    pub fn source(&self) -> SourceId {
        self.source
    }

    /// The endpoint subject names are scoped to.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Subjects registered so far.
    pub fn registry(&self) -> &SubjectRegistry {
        &self.registry
    }

    /// Decode one datagram and publish what it carries.
    ///
    /// Fields are processed in document order. A datagram that is not a
    /// JSON object is rejected whole, before anything is published.
    pub fn decode(&mut self, payload: &[u8], publisher: &mut dyn Publisher) -> Result<DecodeOutcome> {
        let span = tracing::trace_span!(
            target: targets::DECODE,
            span_names::DECODE_DATAGRAM,
            source = %self.source,
            bytes = payload.len()
        );
        let _entered = span.enter();

        let text = widen(payload);
        let document: Value = serde_json::from_str(&text)?;
        let fields = match document {
            Value::Object(fields) => fields,
            other => {
                return Err(DecodeError::NotAnObject {
                    found: kind_of(&other),
                });
            }
        };

        let mut outcome = DecodeOutcome::default();
        let total = fields.len();

        for (index, (field, value)) in fields.iter().enumerate() {
            let key = SubjectKey::new(self.source, SubjectName::scoped(field, &self.endpoint));

            if !self.registry.contains(&key.name) {
                tracing::debug!(target: targets::DECODE, subject = %key.name, role = %self.mapper.role(), "registering subject");
                publisher.register_static_data(&key, self.mapper.role(), self.mapper.static_data());
                self.registry.insert(key.name.clone());
                outcome.registered += 1;
            }

            // Mapping runs before the stop check, so while stopping a malformed
            // field still ends the datagram under `AbortDatagram` and later
            // fields are not registered.
            match self.mapper.frame_data(value) {
                Ok(_) if self.stopping.is_cancelled() => {
                    tracing::trace!(target: targets::PUBLISH, subject = %key.name, "source stopping, frame withheld");
                    outcome.suppressed += 1;
                }
                Ok(frame) => {
                    tracing::trace!(target: targets::PUBLISH, subject = %key.name, "publishing frame");
                    publisher.publish_frame(&key, frame);
                    outcome.published += 1;
                }
                Err(error) => {
                    tracing::error!(target: targets::DECODE, subject = %key.name, %error, "malformed subject payload");
                    outcome.malformed += 1;
                    if self.policy == MalformedFieldPolicy::AbortDatagram {
                        outcome.aborted_at = Some(index);
                        outcome.skipped = total - index - 1;
                        break;
                    }
                }
            }
        }

        Ok(outcome)
    }
}

impl std::fmt::Debug for PacketDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketDecoder")
            .field("source", &self.source)
            .field("endpoint", &self.endpoint)
            .field("role", &self.mapper.role())
            .field("policy", &self.policy)
            .field("subjects", &self.registry.len())
            .finish()
    }
}

/// Widen each byte to the code point of the same value.
fn widen(payload: &[u8]) -> String {
    payload.iter().map(|&byte| char::from(byte)).collect()
}
