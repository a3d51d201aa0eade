//! Session configuration.

use super::error::Error;
use serde::{Deserialize, Serialize};

/// Upload chunk size used when neither the options nor the request set one.
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// How long a blocked send or receive waits for the socket, in milliseconds.
pub const DEFAULT_READY_TIMEOUT_MS: u32 = 60_000;

/// Tunables for a single HTTP exchange.
///
/// Every field has a documented default, so a partial JSON document is enough
/// to override just what differs:
///
/// ```rust
/// use libhttp::network::application::http::SessionOptions;
///
/// let options = SessionOptions::from_json(br#"{"ready_timeout_ms": 5000}"#).unwrap();
/// assert_eq!(options.ready_timeout_ms, 5000);
/// assert_eq!(options, SessionOptions { ready_timeout_ms: 5000, ..Default::default() });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Bytes pulled from the request body per send. `0` selects
    /// [`DEFAULT_UPLOAD_CHUNK_SIZE`]. The session stages uploads in its read
    /// buffer, so the effective size never exceeds that buffer's capacity.
    pub upload_chunk_size: usize,

    /// Readiness timeout applied after every "would block", in milliseconds.
    pub ready_timeout_ms: u32,

    /// Send `Expect: 100-continue` on PUT requests with a body and only upload
    /// once the server answers `100 Continue`.
    pub expect_continue: bool,

    /// Follow the headers of a body-less PUT/POST with a single zero byte.
    pub terminate_empty_upload: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            expect_continue: true,
            terminate_empty_upload: true,
        }
    }
}

impl SessionOptions {
    /// Decode options from a JSON object; absent fields keep their defaults.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json_core::from_slice::<Self>(json)
            .map(|(options, _)| options)
            .map_err(|_| Error::InvalidOptions)
    }

    /// Encode these options as JSON into `buf`, returning the bytes written.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, Error> {
        serde_json_core::to_slice(self, buf).map_err(|_| Error::InvalidOptions)
    }

    /// Upload chunk size after applying the request override and the default.
    pub(crate) fn upload_chunk_size(&self, request_override: Option<usize>) -> usize {
        match request_override.filter(|&size| size > 0) {
            Some(size) => size,
            None if self.upload_chunk_size > 0 => self.upload_chunk_size,
            None => DEFAULT_UPLOAD_CHUNK_SIZE,
        }
    }
}
