//! One request/response exchange over one connect-only socket.
//!
//! A [`Session`] drives the whole exchange: it fills in default headers,
//! connects, writes the request head, negotiates `Expect: 100-continue` for
//! PUT uploads, streams the body, and parses the response head. It then stays
//! alive as the response's body stream, serving bytes left over in its read
//! buffer before pulling more from the socket.
//!
//! # States
//!
//! ```text
//! Idle -> Connected -> HeadersSent -> [AwaitingContinue ->] Uploading
//!      -> HeadersReceived -> StreamingBody -> Done
//! ```
//!
//! The body framing ([`BodyMode`]) is decided once the final head is parsed
//! and never changes afterwards.

use super::buffer::{DEFAULT_READER_SIZE, ReadBuffer};
use super::context::Context;
use super::error::{Error, FramingError, TransportError};
use super::io;
use super::options::SessionOptions;
use super::parser::ResponseParser;
use super::request::{BodyStream, MemoryBodyStream, Method, Request};
use super::response::{ResponseHead, decimal};
use super::upload;
use crate::network::error::Error as _;
use crate::network::{Connect, Connection};
use core::fmt::Write as _;
use heapless::String;

/// Largest request line plus headers the session will serialize.
pub const MAX_REQUEST_HEAD_LEN: usize = 4096;

/// Marker sent after the head of a body-less upload.
const END_OF_REQUEST: [u8; 1] = [0];

/// Progress of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connected,
    HeadersSent,
    AwaitingContinue,
    Uploading,
    HeadersReceived,
    StreamingBody,
    Done,
}

/// How the end of the response body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Not decided yet; the response head has not been parsed.
    Pending,
    /// Exactly this many bytes follow the head.
    ContentLength(u64),
    /// Chunked framing; `remaining` data bytes are left in the current chunk.
    Chunked { remaining: u64 },
    /// Everything until the peer closes the connection.
    CloseDelimited,
}

/// The state of a single in-flight exchange, later the response body stream.
///
/// `N` is the capacity of the read buffer shared by header parsing, chunk
/// decoding, body reads and upload staging.
pub struct Session<C: Connection, const N: usize = DEFAULT_READER_SIZE> {
    socket: Option<C>,
    pub(super) buffer: ReadBuffer<N>,
    options: SessionOptions,
    state: SessionState,
    method: Method,
    mode: BodyMode,
    total_read: u64,
    uploaded_bytes: u64,
}

impl<C: Connection, const N: usize> Session<C, N> {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            socket: None,
            buffer: ReadBuffer::new(),
            options,
            state: SessionState::Idle,
            method: Method::Get,
            mode: BodyMode::Pending,
            total_read: 0,
            uploaded_bytes: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn body_mode(&self) -> BodyMode {
        self.mode
    }

    /// Declared body length, when the response has one.
    pub fn content_length(&self) -> Option<u64> {
        match self.mode {
            BodyMode::ContentLength(len) => Some(len),
            _ => None,
        }
    }

    /// Body bytes handed to the caller so far.
    pub fn total_read(&self) -> u64 {
        self.total_read
    }

    /// Request body bytes sent so far.
    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes
    }

    /// Whether no more body bytes will ever be produced.
    pub fn is_end_of_response(&self) -> bool {
        self.state == SessionState::Done
    }

    /// Run the exchange up to the final response head.
    ///
    /// `request` gains `Host`, `content-length` and (for PUT uploads)
    /// `Expect: 100-continue` headers when it does not already carry them.
    pub fn perform<K>(
        &mut self,
        connector: &mut K,
        ctx: &Context<'_>,
        request: &mut Request<'_>,
    ) -> Result<ResponseHead, Error>
    where
        K: Connect<Connection = C>,
    {
        if self.state != SessionState::Idle {
            return Err(Error::InvariantViolation);
        }
        self.method = request.method;

        let body_length = request.body_length();
        Self::default_headers(request, body_length)?;
        let negotiate =
            request.method == Method::Put && body_length > 0 && self.options.expect_continue;
        if negotiate && !request.headers.contains("expect") {
            request.headers.insert("Expect", "100-continue")?;
        }

        ctx.check()?;
        let url = request.url();
        debug!("connecting to {}:{}", url.host(), url.port());
        let socket = connector
            .connect(url)
            .map_err(|e| Error::connect(e.kind()))?;
        self.socket = Some(socket);
        self.state = SessionState::Connected;

        self.send_head(request)?;
        self.state = SessionState::HeadersSent;

        if request.method.is_upload() && body_length == 0 {
            if self.options.terminate_empty_upload {
                let timeout = self.options.ready_timeout_ms;
                io::send_all(self.socket()?, &END_OF_REQUEST, timeout)?;
            }
        } else if negotiate {
            self.state = SessionState::AwaitingContinue;
            let interim = self.read_head()?;
            if interim.status_code != 100 {
                debug!("server declined upload with {}", interim.status_code);
                return self.begin_body(interim);
            }
            if self.buffer.has_unread() {
                // the final response is already queued; the server does not want the body
                warn!("final response arrived with 100 continue, upload skipped");
            } else {
                trace!("100 continue received, uploading");
                self.upload(ctx, request)?;
            }
        } else if body_length > 0 {
            self.upload(ctx, request)?;
        }

        let head = self.read_final_head()?;
        self.begin_body(head)
    }

    /// Read the next body bytes into `buf`.
    ///
    /// Serves leftover bytes from the read buffer first, then reads from the
    /// socket, never past the current chunk or the declared content length.
    /// Returns `Ok(0)` once the body is exhausted or when `buf` is empty.
    pub fn read(&mut self, ctx: &Context<'_>, buf: &mut [u8]) -> Result<usize, Error> {
        ctx.check()?;
        if buf.is_empty() {
            return Ok(0);
        }
        match self.state {
            SessionState::StreamingBody => {}
            SessionState::Done => return Ok(0),
            _ => return Err(Error::InvariantViolation),
        }

        let limit = match self.mode {
            BodyMode::Chunked { remaining: 0 } => {
                self.skip_chunk_trailer()?;
                let size = self.parse_chunk_size()?;
                if size == 0 {
                    self.finish();
                    return Ok(0);
                }
                self.mode = BodyMode::Chunked { remaining: size };
                size
            }
            BodyMode::Chunked { remaining } => remaining,
            BodyMode::ContentLength(len) => {
                let left = len.saturating_sub(self.total_read);
                if left == 0 {
                    self.finish();
                    return Ok(0);
                }
                left
            }
            BodyMode::CloseDelimited => u64::MAX,
            BodyMode::Pending => return Err(Error::InvariantViolation),
        };
        let want = buf.len().min(usize::try_from(limit).unwrap_or(usize::MAX));

        let read = if self.buffer.has_unread() {
            let mut view = MemoryBodyStream::new(self.buffer.unread());
            let read = view.read(ctx, &mut buf[..want])?;
            self.buffer.consume(read);
            read
        } else {
            let timeout = self.options.ready_timeout_ms;
            io::recv(self.socket()?, &mut buf[..want], timeout)?
        };

        if read == 0 {
            return match self.mode {
                BodyMode::CloseDelimited => {
                    self.finish();
                    Ok(0)
                }
                _ => Err(TransportError::ConnectionClosed.into()),
            };
        }

        self.total_read += read as u64;
        match self.mode {
            BodyMode::Chunked { remaining } => {
                self.mode = BodyMode::Chunked {
                    remaining: remaining - read as u64,
                };
            }
            BodyMode::ContentLength(len) if self.total_read >= len => self.finish(),
            _ => {}
        }
        Ok(read)
    }

    /// Shut the connection down.
    pub fn close(mut self) -> Result<(), Error> {
        match self.socket.take() {
            Some(socket) => socket
                .close()
                .map_err(|e| Error::from(TransportError::Shutdown(e.kind()))),
            None => Ok(()),
        }
    }

    /// Receive a fresh fill into the read buffer, returning its length.
    pub(super) fn fill(&mut self) -> Result<usize, Error> {
        let timeout = self.options.ready_timeout_ms;
        let socket = self.socket.as_mut().ok_or(Error::InvariantViolation)?;
        let received = io::recv(socket, self.buffer.spare(), timeout)?;
        self.buffer.set_filled(received, 0);
        Ok(received)
    }

    fn socket(&mut self) -> Result<&mut C, Error> {
        self.socket.as_mut().ok_or(Error::InvariantViolation)
    }

    fn finish(&mut self) {
        self.state = SessionState::Done;
        trace!("response complete after {} body bytes", self.total_read);
    }

    fn default_headers(request: &mut Request<'_>, body_length: u64) -> Result<(), Error> {
        if !request.headers.contains("host") {
            let host = request.host()?;
            request.headers.insert("Host", &host)?;
        }
        if !request.headers.contains("content-length") {
            let mut length: String<20> = String::new();
            write!(length, "{body_length}").map_err(|_| Error::RequestTooLarge)?;
            request.headers.insert("content-length", &length)?;
        }
        Ok(())
    }

    /// Serialize and send `METHOD target HTTP/1.1`, the headers and the blank line.
    fn send_head(&mut self, request: &Request<'_>) -> Result<(), Error> {
        let mut head: String<MAX_REQUEST_HEAD_LEN> = String::new();
        let target = request.url().target();
        let slash = if target.starts_with('/') { "" } else { "/" };
        write!(head, "{} {}{} HTTP/1.1\r\n", request.method, slash, target)
            .map_err(|_| Error::RequestTooLarge)?;
        for header in &request.headers {
            write!(head, "{}: {}\r\n", header.name, header.value)
                .map_err(|_| Error::RequestTooLarge)?;
        }
        head.push_str("\r\n").map_err(|_| Error::RequestTooLarge)?;

        debug!("sending {} {}{}", request.method, slash, target);
        let timeout = self.options.ready_timeout_ms;
        io::send_all(self.socket()?, head.as_bytes(), timeout)
    }

    fn upload(&mut self, ctx: &Context<'_>, request: &mut Request<'_>) -> Result<(), Error> {
        self.state = SessionState::Uploading;
        let chunk = self
            .options
            .upload_chunk_size(request.upload_chunk_size())
            .min(N);
        let timeout = self.options.ready_timeout_ms;
        let Some(body) = request.body_mut() else {
            return Ok(());
        };
        let socket = self.socket.as_mut().ok_or(Error::InvariantViolation)?;
        // the read buffer is idle until the response arrives
        let staging = &mut self.buffer.spare()[..chunk];
        self.uploaded_bytes += upload::upload(socket, ctx, body, staging, timeout)?;
        Ok(())
    }

    /// Parse one response head, starting with any bytes still unread.
    fn read_head(&mut self) -> Result<ResponseHead, Error> {
        let mut parser = ResponseParser::new();
        if self.buffer.has_unread() {
            let used = parser.feed(self.buffer.unread())?;
            self.buffer.consume(used);
        }
        while !parser.is_completed() {
            let received = self.fill()?;
            if received == 0 {
                return Err(TransportError::ConnectionClosed.into());
            }
            let used = parser.feed(self.buffer.filled())?;
            self.buffer.set_filled(received, used);
        }
        parser.into_head().ok_or(Error::InvariantViolation)
    }

    /// Parse heads until one is final, skipping informational responses.
    fn read_final_head(&mut self) -> Result<ResponseHead, Error> {
        loop {
            let head = self.read_head()?;
            match head.status_code {
                101 => return Ok(head),
                100..=199 => trace!("skipping interim {}", head.status_code),
                _ => return Ok(head),
            }
        }
    }

    /// Fix the body framing from the final head.
    fn begin_body(&mut self, head: ResponseHead) -> Result<ResponseHead, Error> {
        self.state = SessionState::HeadersReceived;
        let status = head.status_code;

        if self.method == Method::Head || matches!(status, 100..=199 | 204 | 304) {
            // the server may announce a length, but never sends a body
            self.mode = BodyMode::ContentLength(0);
            self.buffer.discard();
        } else if let Some(length) = head.header("content-length") {
            let length: u64 =
                decimal(length.as_bytes()).ok_or(FramingError::InvalidContentLength)?;
            self.mode = BodyMode::ContentLength(length);
        } else if head
            .header("transfer-encoding")
            .is_some_and(|coding| contains_ignore_case(coding, "chunked"))
        {
            self.mode = BodyMode::Chunked { remaining: 0 };
            let size = self.parse_chunk_size()?;
            self.mode = BodyMode::Chunked { remaining: size };
            if size == 0 {
                self.finish();
                return Ok(head);
            }
        } else {
            self.mode = BodyMode::CloseDelimited;
        }
        debug!("response {}, body mode selected", status);

        match self.mode {
            BodyMode::ContentLength(0) => self.finish(),
            _ => self.state = SessionState::StreamingBody,
        }
        Ok(head)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

impl<C: Connection, const N: usize> core::fmt::Debug for Session<C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("method", &self.method)
            .field("mode", &self.mode)
            .field("total_read", &self.total_read)
            .field("uploaded_bytes", &self.uploaded_bytes)
            .field("buffered", &self.buffer.unread().len())
            .finish()
    }
}
