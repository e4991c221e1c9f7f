//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use json_livelink::{FrameData, Publisher, Role, StaticData, SubjectKey};
use parking_lot::Mutex;

/// One call made on a publisher.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register {
        subject: SubjectKey,
        role: Role,
        data: StaticData,
    },
    Frame {
        subject: SubjectKey,
        frame: FrameData,
    },
}

impl Call {
    pub fn subject(&self) -> &SubjectKey {
        match self {
            Call::Register { subject, .. } | Call::Frame { subject, .. } => subject,
        }
    }

    pub fn is_register(&self) -> bool {
        matches!(self, Call::Register { .. })
    }
}

/// Publisher that records every call in order.
///
/// Clones share the same log, so a test can keep one clone while the
/// context owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn registrations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_register).collect()
    }

    pub fn frames(&self) -> Vec<(SubjectKey, FrameData)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Frame { subject, frame } => Some((subject, frame)),
                Call::Register { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Publisher for RecordingPublisher {
    fn register_static_data(&mut self, subject: &SubjectKey, role: Role, data: StaticData) {
        self.calls.lock().push(Call::Register {
            subject: subject.clone(),
            role,
            data,
        });
    }

    fn publish_frame(&mut self, subject: &SubjectKey, frame: FrameData) {
        self.calls.lock().push(Call::Frame {
            subject: subject.clone(),
            frame,
        });
    }
}

/// Poll `condition` until it holds or five seconds pass.
pub fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
