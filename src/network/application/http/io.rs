//! Blocking send/receive loops over a non-blocking socket.
//!
//! "Would block" never escapes this module: it is turned into a readiness wait
//! and a retry, or into [`TransportError::Timeout`] when the wait expires.

use super::error::{Error, TransportError};
use crate::network::error::Error as _;
use crate::network::{Interest, Poll, Read, Readiness, Write};

/// Block until `socket` is ready for `interest`, or fail once `timeout_ms` elapses.
pub fn wait_for_ready<C: Poll>(
    socket: &mut C,
    interest: Interest,
    timeout_ms: u32,
) -> Result<(), Error> {
    match socket.poll_ready(interest, timeout_ms) {
        Readiness::Ready => Ok(()),
        Readiness::TimedOut => {
            warn!("socket not ready after {} ms", timeout_ms);
            Err(TransportError::Timeout.into())
        }
        Readiness::Errored => Err(TransportError::ReadinessFailed.into()),
    }
}

/// Send all of `buf`, waiting out "would block" signals.
///
/// Any other failure is returned at once without retrying.
pub fn send_all<C: Write + Poll>(socket: &mut C, buf: &[u8], timeout_ms: u32) -> Result<(), Error> {
    let mut sent = 0;
    while sent < buf.len() {
        match socket.write(&buf[sent..]) {
            Ok(0) => {
                return Err(Error::Transport(TransportError::Send(
                    crate::network::error::ErrorKind::WriteError,
                )));
            }
            Ok(n) => sent += n,
            Err(e) if e.would_block() => wait_for_ready(socket, Interest::Writable, timeout_ms)?,
            Err(e) => return Err(Error::send(&e)),
        }
    }
    Ok(())
}

/// Receive into `buf`, waiting out "would block" signals.
///
/// Returns the number of bytes received; `0` means the peer closed the
/// connection (or `buf` was empty).
pub fn recv<C: Read + Poll>(socket: &mut C, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Error> {
    if buf.is_empty() {
        return Ok(0);
    }
    loop {
        match socket.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.would_block() => wait_for_ready(socket, Interest::Readable, timeout_ms)?,
            Err(e) => return Err(Error::receive(&e)),
        }
    }
}
