//! Response-side types and status/header line construction.

use super::context::Context;
use super::error::{Error, FramingError};
use super::request::{Header, Headers, MAX_HEADER_NAME_LEN};
use super::session::Session;
use crate::network::Connection;
use heapless::String;

/// Maximum length kept of a reason phrase; longer phrases are truncated.
pub const MAX_REASON_LEN: usize = 64;

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub version_major: u16,
    pub version_minor: u16,
    pub status_code: u16,
    pub reason: String<MAX_REASON_LEN>,
    /// Header names are stored lower-cased.
    pub headers: Headers,
}

impl ResponseHead {
    /// Build a head from a status line with its CRLF already removed.
    ///
    /// The line is split by four scans: `.` ends the major version, a space the
    /// minor version, another space the status code, and CR (or the end of the
    /// line) the reason phrase.
    pub fn from_status_line(line: &[u8]) -> Result<Self, Error> {
        let rest = line
            .strip_prefix(b"HTTP/")
            .ok_or(FramingError::InvalidStatusLine)?;

        let dot = find(rest, b'.').ok_or(FramingError::InvalidStatusLine)?;
        let version_major = decimal(&rest[..dot]).ok_or(FramingError::InvalidVersion)?;
        let rest = &rest[dot + 1..];

        let space = find(rest, b' ').ok_or(FramingError::InvalidStatusLine)?;
        let version_minor = decimal(&rest[..space]).ok_or(FramingError::InvalidVersion)?;
        let rest = &rest[space + 1..];

        // a missing reason phrase is tolerated: "HTTP/1.1 204"
        let space = find(rest, b' ').unwrap_or(rest.len());
        let code = &rest[..space];
        if code.len() != 3 {
            return Err(FramingError::InvalidStatusCode.into());
        }
        let status_code = decimal(code).ok_or(FramingError::InvalidStatusCode)?;

        let rest = rest.get(space + 1..).unwrap_or(&[]);
        let end = find(rest, b'\r').unwrap_or(rest.len());
        let reason = core::str::from_utf8(&rest[..end])
            .map_err(|_| FramingError::InvalidStatusLine)?;

        Ok(Self {
            version_major,
            version_minor,
            status_code,
            reason: truncated(reason),
            headers: Headers::new(),
        })
    }

    /// Add a `name: value` line, lower-casing the name and trimming the value.
    pub fn push_header_line(&mut self, line: &[u8]) -> Result<(), Error> {
        let colon = find(line, b':').ok_or(FramingError::InvalidHeader)?;
        let name = core::str::from_utf8(&line[..colon])
            .map_err(|_| FramingError::InvalidHeader)?
            .trim();
        let value = core::str::from_utf8(&line[colon + 1..])
            .map_err(|_| FramingError::InvalidHeader)?
            .trim_matches(|c| c == ' ' || c == '\t');
        if name.is_empty() {
            return Err(FramingError::InvalidHeader.into());
        }

        let mut lowered: String<MAX_HEADER_NAME_LEN> = String::new();
        for c in name.chars() {
            lowered
                .push(c.to_ascii_lowercase())
                .map_err(|_| FramingError::HeaderTooLarge)?;
        }
        let header = Header {
            name: lowered,
            value: String::try_from(value).map_err(|_| FramingError::HeaderTooLarge)?,
        };
        self.headers
            .push(header)
            .map_err(|_| FramingError::TooManyHeaders.into())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

/// A response whose body is still on the wire.
///
/// The response owns the [`Session`] that produced it; body bytes are pulled
/// from the socket only as [`RawResponse::read`] is called.
pub struct RawResponse<C: Connection, const N: usize> {
    head: ResponseHead,
    session: Session<C, N>,
}

impl<C: Connection, const N: usize> RawResponse<C, N> {
    pub(crate) fn new(head: ResponseHead, session: Session<C, N>) -> Self {
        Self { head, session }
    }

    pub fn status_code(&self) -> u16 {
        self.head.status_code
    }

    pub fn reason(&self) -> &str {
        &self.head.reason
    }

    /// `(major, minor)` HTTP version.
    pub fn version(&self) -> (u16, u16) {
        (self.head.version_major, self.head.version_minor)
    }

    pub fn headers(&self) -> &Headers {
        &self.head.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// The session acting as this response's body stream.
    pub fn body(&mut self) -> &mut Session<C, N> {
        &mut self.session
    }

    /// Read the next body bytes; `Ok(0)` once the body is exhausted.
    pub fn read(&mut self, ctx: &Context<'_>, buf: &mut [u8]) -> Result<usize, Error> {
        self.session.read(ctx, buf)
    }

    /// Read until the body ends or `out` is full, returning the bytes stored.
    pub fn read_to_end(&mut self, ctx: &Context<'_>, out: &mut [u8]) -> Result<usize, Error> {
        let mut filled = 0;
        while filled < out.len() {
            match self.session.read(ctx, &mut out[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }

    /// Split into head and body session.
    pub fn into_parts(self) -> (ResponseHead, Session<C, N>) {
        (self.head, self.session)
    }

    /// Shut the underlying connection down, discarding any unread body.
    pub fn close(self) -> Result<(), Error> {
        self.session.close()
    }
}

impl<C: Connection, const N: usize> core::fmt::Debug for RawResponse<C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawResponse")
            .field("head", &self.head)
            .field("session", &self.session)
            .finish()
    }
}

fn find(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

/// Parse a non-empty run of ASCII digits.
pub(crate) fn decimal<T: TryFrom<u64>>(digits: &[u8]) -> Option<T> {
    if digits.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    T::try_from(value).ok()
}

fn truncated(reason: &str) -> String<MAX_REASON_LEN> {
    let mut end = reason.len().min(MAX_REASON_LEN);
    while !reason.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    // cannot fail: end <= capacity
    let _ = out.push_str(&reason[..end]);
    out
}
