//! The consumer-side contract for decoded subjects.

use crate::role::{FrameData, Role, StaticData};
use crate::subject::SubjectKey;

/// Receives static data and frames for decoded subjects.
///
/// Both calls happen on the consumer context's thread, never on a receive
/// thread. For each subject `register_static_data` is called exactly once,
/// before any `publish_frame` for that subject.
pub trait Publisher {
    /// Announce a subject and its static data.
    fn register_static_data(&mut self, subject: &SubjectKey, role: Role, data: StaticData);

    /// Push one frame for an announced subject.
    fn publish_frame(&mut self, subject: &SubjectKey, frame: FrameData);
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn register_static_data(&mut self, subject: &SubjectKey, role: Role, data: StaticData) {
        (**self).register_static_data(subject, role, data);
    }

    fn publish_frame(&mut self, subject: &SubjectKey, frame: FrameData) {
        (**self).publish_frame(subject, frame);
    }
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn register_static_data(&mut self, subject: &SubjectKey, role: Role, data: StaticData) {
        (**self).register_static_data(subject, role, data);
    }

    fn publish_frame(&mut self, subject: &SubjectKey, frame: FrameData) {
        (**self).publish_frame(subject, frame);
    }
}
