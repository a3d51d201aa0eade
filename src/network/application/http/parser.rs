//! Resumable status-line and header parser.
//!
//! The parser is fed successive fills of the session's read buffer. A line may
//! be split anywhere across fills, including between its CR and LF; the
//! unterminated tail of one fill is carried in a small accumulation buffer
//! until the next fill completes it.

use super::error::{Error, FramingError};
use super::response::ResponseHead;
use heapless::Vec;

/// Longest status or header line accepted, whether it arrives in one fill or
/// is carried across several.
pub const MAX_LINE_LEN: usize = 1024;

/// Where the parser is in the response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for `HTTP/x.y code reason`.
    StatusLine,
    /// Collecting header lines until the blank line.
    Headers,
    /// The blank line has been seen; everything after it is body.
    Completed,
}

/// Incremental parser for a response's status line and headers.
///
/// ```rust
/// use libhttp::network::application::http::ResponseParser;
///
/// let mut parser = ResponseParser::new();
/// assert_eq!(parser.feed(b"HTTP/1.1 200 OK\r\ncontent-le").unwrap(), 27);
/// let fill = b"ngth: 5\r\n\r\nhello";
/// let consumed = parser.feed(fill).unwrap();
/// assert!(parser.is_completed());
/// assert_eq!(&fill[consumed..], b"hello");
///
/// let head = parser.into_head().unwrap();
/// assert_eq!(head.status_code, 200);
/// assert_eq!(head.header("content-length"), Some("5"));
/// ```
#[derive(Debug)]
pub struct ResponseParser {
    state: ParserState,
    partial: Vec<u8, MAX_LINE_LEN>,
    pending_cr: bool,
    head: Option<ResponseHead>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::StatusLine,
            partial: Vec::new(),
            pending_cr: false,
            head: None,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == ParserState::Completed
    }

    /// The parsed head, once the status line has been seen.
    pub fn head(&self) -> Option<&ResponseHead> {
        self.head.as_ref()
    }

    /// Take the parsed head. `None` until the parser has completed.
    pub fn into_head(self) -> Option<ResponseHead> {
        if self.is_completed() { self.head } else { None }
    }

    /// Consume one fill, returning how many of its bytes belong to the head.
    ///
    /// While the head is incomplete the whole fill is consumed. Once the blank
    /// line is found the offset just past its LF is returned and the remaining
    /// bytes are left for the body reader. After completion this is a no-op
    /// returning `0`.
    pub fn feed(&mut self, fill: &[u8]) -> Result<usize, Error> {
        if self.state == ParserState::Completed {
            return Ok(0);
        }

        // a CR that ended the previous fill but is not followed by LF is content
        if self.pending_cr && fill.first().is_some_and(|&b| b != b'\n') {
            self.carry(b"\r")?;
        }

        let mut start = 0;
        for (index, &byte) in fill.iter().enumerate() {
            match byte {
                b'\r' => self.pending_cr = true,
                b'\n' if self.pending_cr => {
                    self.pending_cr = false;
                    // index 0 means the CR was left behind in the previous fill
                    let end = index.saturating_sub(1).max(start);
                    let slice = &fill[start..end];
                    start = index + 1;

                    let blank = if self.partial.is_empty() {
                        if slice.len() > MAX_LINE_LEN {
                            return Err(FramingError::HeaderTooLarge.into());
                        }
                        self.finish_line(slice)?
                    } else {
                        self.carry(slice)?;
                        let line = core::mem::take(&mut self.partial);
                        self.finish_line(&line)?
                    };
                    if blank {
                        return Ok(start);
                    }
                }
                _ => self.pending_cr = false,
            }
        }

        if start < fill.len() {
            // hold back a trailing CR, the LF may open the next fill
            let end = fill.len() - usize::from(self.pending_cr);
            self.carry(&fill[start..end])?;
        }
        Ok(fill.len())
    }

    fn carry(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.partial
            .extend_from_slice(bytes)
            .map_err(|_| FramingError::HeaderTooLarge.into())
    }

    /// Apply one complete line; `true` when it was the blank line ending the head.
    fn finish_line(&mut self, line: &[u8]) -> Result<bool, Error> {
        match self.state {
            ParserState::StatusLine => {
                let head = ResponseHead::from_status_line(line)?;
                trace!("status line parsed: {}", head.status_code);
                self.head = Some(head);
                self.state = ParserState::Headers;
                Ok(false)
            }
            ParserState::Headers if line.is_empty() => {
                self.state = ParserState::Completed;
                self.partial.clear();
                Ok(true)
            }
            ParserState::Headers => {
                let head = self.head.as_mut().ok_or(Error::InvariantViolation)?;
                head.push_header_line(line)?;
                Ok(false)
            }
            ParserState::Completed => Err(Error::InvariantViolation),
        }
    }
}
