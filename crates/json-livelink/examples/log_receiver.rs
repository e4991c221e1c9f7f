//! JSON Live Link receiver that logs what it decodes
//!
//! Binds an endpoint (default 127.0.0.1:54321) and prints each registration
//! and, at most once per second per subject, the latest frame.
//!
//! Run with: cargo run -p json-livelink --example log_receiver -- [ADDR:PORT] [basic|camera]
//!
//! Set `RUST_LOG=json_livelink=debug` to see registrations and discarded
//! datagrams from the library itself.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use json_livelink::{
    BasicMapper, CameraMapper, ConsumerContext, Endpoint, FrameData, Publisher, Role,
    SourceConfig, StaticData, SubjectKey, SubjectName,
};
use tracing_subscriber::EnvFilter;

/// Prints registrations, throttles frames.
#[derive(Default)]
struct LogPublisher {
    last_printed: HashMap<SubjectName, Instant>,
    frames: u64,
}

impl Publisher for LogPublisher {
    fn register_static_data(&mut self, subject: &SubjectKey, role: Role, data: StaticData) {
        tracing::info!(subject = %subject.name, %role, ?data, "subject registered");
    }

    fn publish_frame(&mut self, subject: &SubjectKey, frame: FrameData) {
        self.frames += 1;

        let now = Instant::now();
        let due = self
            .last_printed
            .get(&subject.name)
            .is_none_or(|last| now.duration_since(*last) >= Duration::from_secs(1));
        if !due {
            return;
        }
        self.last_printed.insert(subject.name.clone(), now);

        match frame {
            FrameData::Basic(data) => {
                tracing::info!(subject = %subject.name, values = ?data.property_values, "frame");
            }
            FrameData::Camera(data) => {
                let (axis, angle) = data.transform.rotation.to_axis_angle();
                tracing::info!(
                    subject = %subject.name,
                    translation = ?data.transform.translation,
                    axis = ?axis,
                    angle_deg = angle.to_degrees(),
                    focal_length = data.focal_length,
                    focus_distance = data.focus_distance,
                    aperture = data.aperture,
                    "frame"
                );
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let endpoint = match args.next().map(|arg| arg.parse::<Endpoint>()) {
        Some(Ok(endpoint)) => endpoint,
        Some(Err(error)) => {
            tracing::error!(%error, "bad endpoint");
            std::process::exit(2);
        }
        None => Endpoint::default(),
    };
    let camera = args.next().is_some_and(|role| role.eq_ignore_ascii_case("camera"));

    let mut context = ConsumerContext::new(LogPublisher::default());
    let config = SourceConfig::new(endpoint);
    let source = if camera {
        context.create_source(&config, CameraMapper::new())
    } else {
        context.create_source(&config, BasicMapper)
    };

    tracing::info!(
        %endpoint,
        status = %source.status(),
        source_type = source.source_type(),
        machine = source.machine_name(),
        "source created"
    );
    if let Some(error) = source.setup_error() {
        tracing::error!(%error, "could not bind endpoint");
        return;
    }

    let mut last_report = Instant::now();
    loop {
        context.wait_and_process(Duration::from_millis(16));

        if last_report.elapsed() >= Duration::from_secs(10) {
            tracing::info!(frames = context.publisher().frames, "still receiving");
            last_report = Instant::now();
        }
    }
}
