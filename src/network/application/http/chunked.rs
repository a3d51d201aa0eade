//! Chunked transfer-encoding decoding.
//!
//! Chunk-size lines are read out of the same buffer the body reader serves
//! from. Only the leading hex run of a size line matters; any extension after
//! it is skipped up to the LF.

use super::error::{Error, FramingError, TransportError};
use super::session::Session;
use crate::network::Connection;

/// Streaming decoder for one `<hex>[;ext]\r\n` chunk-size line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSizeLine {
    size: u64,
    digits: usize,
    in_extension: bool,
}

impl ChunkSizeLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume bytes up to and including the line's LF.
    ///
    /// Returns how many bytes were used and, once the LF was seen, the chunk size.
    /// Without an LF every byte is used and more input is needed.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(usize, Option<u64>), Error> {
        for (index, &byte) in bytes.iter().enumerate() {
            if byte == b'\n' {
                if self.digits == 0 {
                    return Err(FramingError::InvalidChunkSize.into());
                }
                return Ok((index + 1, Some(self.size)));
            }
            if self.in_extension {
                continue;
            }
            match hex_value(byte) {
                Some(nibble) => {
                    self.size = self
                        .size
                        .checked_mul(16)
                        .and_then(|size| size.checked_add(u64::from(nibble)))
                        .ok_or(FramingError::InvalidChunkSize)?;
                    self.digits += 1;
                }
                None if self.digits == 0 && (byte == b' ' || byte == b'\t') => {}
                None => self.in_extension = true,
            }
        }
        Ok((bytes.len(), None))
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

impl<C: Connection, const N: usize> Session<C, N> {
    /// Read the next chunk-size line, refilling from the socket as needed.
    ///
    /// Leaves the buffer cursor on the chunk's first data byte. When the line
    /// ends exactly at the end of the fill and more data follows, the buffer
    /// is refilled straight away.
    pub(super) fn parse_chunk_size(&mut self) -> Result<u64, Error> {
        let mut line = ChunkSizeLine::new();
        loop {
            if !self.buffer.has_unread() {
                self.fill_body()?;
            }
            let (used, size) = line.feed(self.buffer.unread())?;
            self.buffer.consume(used);
            if let Some(size) = size {
                trace!("chunk size {}", size);
                if size > 0 && !self.buffer.has_unread() {
                    self.fill_body()?;
                }
                return Ok(size);
            }
        }
    }

    /// Skip the CRLF that follows every chunk's data.
    pub(super) fn skip_chunk_trailer(&mut self) -> Result<(), Error> {
        for expected in [b'\r', b'\n'] {
            let byte = match self.buffer.next_byte() {
                Some(byte) => byte,
                None => {
                    self.fill_body()?;
                    self.buffer.next_byte().ok_or(Error::InvariantViolation)?
                }
            };
            if byte != expected {
                return Err(FramingError::InvalidChunkTrailer.into());
            }
        }
        Ok(())
    }

    /// Refill the buffer for framing bytes that must exist.
    fn fill_body(&mut self) -> Result<usize, Error> {
        match self.fill()? {
            0 => Err(TransportError::ConnectionClosed.into()),
            n => Ok(n),
        }
    }
}
