//! JSON Live Link: a JSON-over-UDP live link bridge.
//!
//! Emitters send small JSON objects over UDP, one field per subject:
//!
//! ```json
//! { "camA": { "UserData": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9] } }
//! ```
//!
//! Each [`LiveLinkSource`] binds one endpoint and drains it on a dedicated
//! thread. Payloads are handed to a [`ConsumerContext`], which decodes them
//! on the owner's thread and drives a [`Publisher`]:
//!
//! - the first time a subject is seen, its static data is registered
//! - every well-formed field then produces one frame
//!
//! Subjects are named `<field>@<endpoint>`, so the same field arriving on two
//! endpoints yields two subjects.
//!
//! # Mappers
//!
//! - [`BasicMapper`]: ten channels `userdata0..userdata9`, values as sent
//! - [`CameraMapper`]: translation, Euler rotation, unit scale and lens values
//!
//! # Example
//!
//! ```no_run
//! use json_livelink::{
//!     CameraMapper, ConsumerContext, Endpoint, FrameData, Publisher, Role, SourceConfig,
//!     StaticData, SubjectKey,
//! };
//!
//! struct Print;
//!
//! impl Publisher for Print {
//!     fn register_static_data(&mut self, subject: &SubjectKey, role: Role, _: StaticData) {
//!         println!("new {role} subject {}", subject.name);
//!     }
//!
//!     fn publish_frame(&mut self, subject: &SubjectKey, frame: FrameData) {
//!         println!("{}: {frame:?}", subject.name);
//!     }
//! }
//!
//! let mut context = ConsumerContext::new(Print);
//! let source = context.create_source(
//!     &SourceConfig::new(Endpoint::localhost(54321)),
//!     CameraMapper::new(),
//! );
//! println!("{}", source.status());
//!
//! loop {
//!     context.wait_and_process(std::time::Duration::from_millis(16));
//! }
//! ```

mod config;
mod context;
mod decoder;
mod error;
pub mod mapper;
mod publisher;
mod role;
mod source;
mod subject;

pub use config::{MalformedFieldPolicy, SourceConfig};
pub use context::{ConsumerContext, Handoff};
pub use decoder::{DecodeOutcome, PacketDecoder};
pub use error::{DecodeError, MappingError, Result};
pub use mapper::{
    AngleUnit, BasicMapper, CameraMapper, EulerConvention, Handedness, LensChannels, PayloadMapper,
    RotationOrder,
};
pub use publisher::Publisher;
pub use role::{
    BasicFrameData, BasicStaticData, CameraFrameData, CameraStaticData, FrameData, Role,
    StaticData, Transform,
};
pub use source::{LiveLinkSource, MACHINE_NAME, SOURCE_TYPE, SourceStatus};
pub use subject::{SourceId, SubjectKey, SubjectName, SubjectRegistry};

pub use json_livelink_core::CancellationToken;
pub use json_livelink_net::{Endpoint, MulticastConfig, NetworkError, ReceiverConfig, ReceiverState};
