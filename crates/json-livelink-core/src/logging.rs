//! Logging facilities for JSON Live Link.
//!
//! JSON Live Link uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("json_livelink=debug,json_livelink_net=info")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every crate in the workspace logs under one of the [`targets`] below, so a
//! single directive can silence or focus a subsystem.

/// Span names used throughout JSON Live Link for tracing.
pub mod span_names {
    /// The network receive thread.
    pub const RECEIVE_LOOP: &str = "json_livelink::receive_loop";
    /// Decoding of a single datagram on the consumer context.
    pub const DECODE_DATAGRAM: &str = "json_livelink::decode_datagram";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core hand-off queue target.
    pub const DISPATCH: &str = "json_livelink_core::dispatch";
    /// Endpoint binding target.
    pub const BIND: &str = "json_livelink_net::bind";
    /// Network receive thread target.
    pub const RECEIVE: &str = "json_livelink_net::receive";
    /// Source lifecycle target.
    pub const SOURCE: &str = "json_livelink::source";
    /// Datagram decoding and subject registration target.
    pub const DECODE: &str = "json_livelink::decode";
    /// Frame publishing target.
    pub const PUBLISH: &str = "json_livelink::publish";
}
