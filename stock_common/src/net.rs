//! Shared networking constants and helpers used by client and server.

/// Default interface the HTTP server binds to.
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Path of the SSE quote stream.
pub const STREAM_PATH: &str = "/stream";
/// Path of the HTML dashboard.
pub const INDEX_PATH: &str = "/";

/// MIME type of a Server-Sent Events body.
pub const EVENT_STREAM_MIME: &str = "text/event-stream";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
