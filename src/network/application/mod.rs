//! # Application Layer Protocols
//!
//! Protocol engines built on the socket traits in [`crate::network`]. Each one
//! works with any type implementing [`Connection`](crate::network::Connection)
//! and keeps its buffers on the stack.

/// HTTP/1.1 client engine.
///
/// Sends one request per connection, negotiates `Expect: 100-continue` for
/// uploads, and streams response bodies framed by length, chunks or close.
pub mod http;
