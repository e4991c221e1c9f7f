//! The consumer-owned context that decodes and publishes.
//!
//! Receive threads never decode. They post copied payloads here, and the
//! owner of the context drains the queue on its own thread, typically once
//! per update tick.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use json_livelink_core::logging::targets;
use json_livelink_core::{CancellationToken, ConsumerQueue};

use crate::config::SourceConfig;
use crate::decoder::PacketDecoder;
use crate::mapper::PayloadMapper;
use crate::publisher::Publisher;
use crate::source::LiveLinkSource;
use crate::subject::{SourceId, SubjectRegistry};

/// Work posted from a source to the consumer context.
#[derive(Debug, Clone)]
pub enum Handoff {
    /// One received datagram, owned.
    Datagram { source: SourceId, payload: Bytes },
    /// The source has shut down; nothing more will follow from it.
    Detach { source: SourceId },
}

/// Decodes datagrams from any number of sources and feeds a publisher.
///
/// # Example
///
/// ```no_run
/// use json_livelink::{BasicMapper, ConsumerContext, Endpoint, SourceConfig};
/// # use json_livelink::{FrameData, Publisher, Role, StaticData, SubjectKey};
/// # struct Log;
/// # impl Publisher for Log {
/// #     fn register_static_data(&mut self, _: &SubjectKey, _: Role, _: StaticData) {}
/// #     fn publish_frame(&mut self, _: &SubjectKey, _: FrameData) {}
/// # }
///
/// let mut context = ConsumerContext::new(Log);
/// let source = context.create_source(&SourceConfig::new(Endpoint::localhost(54321)), BasicMapper);
///
/// loop {
///     context.process_pending();
///     # break;
/// }
/// source.request_shutdown();
/// ```
pub struct ConsumerContext<P: Publisher> {
    queue: ConsumerQueue<Handoff>,
    decoders: HashMap<SourceId, PacketDecoder>,
    publisher: P,
}

impl<P: Publisher> ConsumerContext<P> {
    /// Create a context that publishes to `publisher`.
    pub fn new(publisher: P) -> Self {
        Self {
            queue: ConsumerQueue::new(),
            decoders: HashMap::new(),
            publisher,
        }
    }

    /// Bind the configured endpoint and start receiving into this context.
    ///
    /// Always returns a source. If the endpoint cannot be bound the source
    /// reports "Device Not Found" and never delivers anything.
    pub fn create_source(
        &mut self,
        config: &SourceConfig,
        mapper: impl PayloadMapper + 'static,
    ) -> LiveLinkSource {
        let id = SourceId::next();
        let stopping = CancellationToken::new();

        let decoder = PacketDecoder::new(
            id,
            config.endpoint(),
            Box::new(mapper),
            config.malformed_field,
            stopping.clone(),
        );
        self.decoders.insert(id, decoder);

        LiveLinkSource::start(id, config, self.queue.dispatcher(), stopping)
    }

    /// Process everything queued so far. Returns the number of items handled.
    pub fn process_pending(&mut self) -> usize {
        let Self {
            queue,
            decoders,
            publisher,
        } = self;
        queue.process_all(|item| handle(decoders, publisher, item))
    }

    /// Process at most one batch of queued items.
    pub fn process_batch(&mut self) -> usize {
        let Self {
            queue,
            decoders,
            publisher,
        } = self;
        queue.process_batch(|item| handle(decoders, publisher, item))
    }

    /// Wait up to `timeout` for work, then process everything pending.
    pub fn wait_and_process(&mut self, timeout: Duration) -> usize {
        let Self {
            queue,
            decoders,
            publisher,
        } = self;
        queue.wait_and_process(timeout, |item| handle(decoders, publisher, item))
    }

    /// Number of items waiting.
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Number of sources that have not been detached yet.
    pub fn source_count(&self) -> usize {
        self.decoders.len()
    }

    /// The subjects a source has registered, if the source is still attached.
    pub fn registry(&self, source: SourceId) -> Option<&SubjectRegistry> {
        self.decoders.get(&source).map(PacketDecoder::registry)
    }

    /// Get a reference to the publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Get a mutable reference to the publisher.
    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Consume the context, returning the publisher.
    pub fn into_publisher(self) -> P {
        self.publisher
    }
}

impl<P: Publisher> std::fmt::Debug for ConsumerContext<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerContext")
            .field("pending", &self.queue.pending_count())
            .field("sources", &self.decoders.len())
            .finish_non_exhaustive()
    }
}

fn handle<P: Publisher>(
    decoders: &mut HashMap<SourceId, PacketDecoder>,
    publisher: &mut P,
    item: Handoff,
) {
    match item {
        Handoff::Datagram { source, payload } => {
            let Some(decoder) = decoders.get_mut(&source) else {
                tracing::trace!(target: targets::DECODE, %source, "datagram for detached source dropped");
                return;
            };
            match decoder.decode(&payload, publisher) {
                Ok(outcome) => {
                    tracing::trace!(
                        target: targets::DECODE,
                        %source,
                        registered = outcome.registered,
                        published = outcome.published,
                        suppressed = outcome.suppressed,
                        malformed = outcome.malformed,
                        skipped = outcome.skipped,
                        "datagram decoded"
                    );
                }
                Err(error) => {
                    tracing::debug!(target: targets::DECODE, %source, %error, "datagram discarded");
                }
            }
        }
        Handoff::Detach { source } => {
            if let Some(decoder) = decoders.remove(&source) {
                tracing::debug!(
                    target: targets::SOURCE,
                    %source,
                    subjects = decoder.registry().len(),
                    "source detached"
                );
            }
        }
    }
}

static_assertions::assert_impl_all!(Handoff: Send);
