//! JSON Live Link test emitter
//!
//! Streams one subject, `Test01`, to 127.0.0.1:54321. Z drifts upward and
//! wraps, yaw sweeps from -90 to 90 degrees.
//!
//! Run with: cargo run -p json-livelink --example udp_sender
//!
//! Pair it with `log_receiver` to watch the frames arrive.

use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

const TARGET: &str = "127.0.0.1:54321";
const SUBJECT: &str = "Test01";

/// Position and orientation of the simulated tracker.
struct Tracker {
    x: f64,
    y: f64,
    z: f64,
    roll: f64,
    pitch: f64,
    yaw: f64,
}

impl Tracker {
    fn step(&mut self) {
        self.z = if self.z > 180.0 { 20.0 } else { self.z + 0.5 };
        self.yaw = if self.yaw > 90.0 { -90.0 } else { self.yaw + 0.5 };
    }

    fn to_json(&self) -> String {
        serde_json::json!({
            SUBJECT: {
                "UserData": [
                    self.x, self.y, self.z,
                    self.roll, self.pitch, self.yaw,
                    0.0, 0.0, 0.0, 0.0
                ]
            }
        })
        .to_string()
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    let mut tracker = Tracker {
        x: 10.0,
        y: 5.0,
        z: 180.0,
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };

    tracing::info!(target = TARGET, subject = SUBJECT, "sending");

    let mut sent: u64 = 0;
    loop {
        tracker.step();
        socket.send_to(tracker.to_json().as_bytes(), TARGET)?;

        sent += 1;
        if sent % 600 == 0 {
            tracing::info!(sent, z = tracker.z, yaw = tracker.yaw, "progress");
        }
        // Roughly 60 packets per second.
        thread::sleep(Duration::from_millis(16));
    }
}
