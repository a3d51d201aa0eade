//! HTTP/1.1 client engine for connect-only, non-blocking sockets.
//!
//! The engine sends one request per connection and streams the response body
//! back to the caller on demand. All state lives in fixed-size buffers, so the
//! engine runs in `no_std` environments.
//!
//! # Features
//!
//! - Incremental response-head parsing that tolerates any fragmentation
//! - `content-length`, chunked and close-delimited bodies
//! - `Expect: 100-continue` negotiation for PUT uploads
//! - Readiness timeouts on every blocked send or receive
//! - Cooperative cancellation through [`Context`]
//!
//! # Usage
//!
//! The entry point is [`Client`], which works with any connector implementing
//! [`crate::network::Connect`].
//!
//! ```rust,no_run
//! use libhttp::network::Connect;
//! use libhttp::network::application::http::{Client, Context, Error, Method, Request};
//!
//! fn fetch<K: Connect>(connector: K, out: &mut [u8]) -> Result<usize, Error> {
//!     let mut client: Client<K> = Client::new(connector);
//!     let mut request = Request::new(Method::Get, "http://example.com/status")?;
//!     let ctx = Context::background();
//!
//!     let mut response = client.send(&ctx, &mut request)?;
//!     let read = response.read_to_end(&ctx, out)?;
//!     response.close()?;
//!     Ok(read)
//! }
//! ```

mod buffer;
mod chunked;
mod client;
mod context;
mod error;
mod io;
mod options;
mod parser;
mod request;
mod response;
mod session;
mod upload;

pub use buffer::DEFAULT_READER_SIZE;
pub use chunked::ChunkSizeLine;
pub use client::Client;
pub use context::Context;
pub use error::{Error, FramingError, TransportError};
pub use io::{recv, send_all, wait_for_ready};
pub use options::{DEFAULT_READY_TIMEOUT_MS, DEFAULT_UPLOAD_CHUNK_SIZE, SessionOptions};
pub use parser::{MAX_LINE_LEN, ParserState, ResponseParser};
pub use request::{
    BodyStream, Header, Headers, MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_HEADERS,
    MemoryBodyStream, Method, Request,
};
pub use response::{MAX_REASON_LEN, RawResponse, ResponseHead};
pub use session::{BodyMode, MAX_REQUEST_HEAD_LEN, Session, SessionState};
