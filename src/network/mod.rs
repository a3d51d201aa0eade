//! A socket abstraction layer for connect-only transports
//!
//! This module provides the small set of traits the HTTP engine drives: a
//! non-blocking receive, a non-blocking send, a readiness query and a connector
//! that hands back an established connection. Implementations report "no bytes
//! could be moved right now" through [`error::ErrorKind::WouldBlock`] instead of
//! blocking.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for socket operations
pub mod error;

/// Application layer protocols built on top of the socket traits
pub mod application;

/// Minimal URL view used to address connections and build request lines
pub mod url;

/// `std::net` backed connector
#[cfg(feature = "std")]
pub mod tcp;

pub use url::Url;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Poll, Read, Write};
}

/// Non-blocking receive.
pub trait Read {
    /// Associated error type
    type Error: error::Error;
    /// Read whatever is available, returning `Ok(0)` once the peer has closed.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Non-blocking send.
pub trait Write {
    /// Associated error type
    type Error: error::Error;
    /// Write as many bytes as the socket accepts right now.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Orderly shutdown of a connection.
pub trait Close {
    /// Associated error type
    type Error: error::Error;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// Direction a readiness wait is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    /// Wait until a receive can make progress.
    Readable,
    /// Wait until a send can make progress.
    Writable,
}

/// Outcome of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The socket can make progress in the requested direction.
    Ready,
    /// The timeout elapsed first.
    TimedOut,
    /// An error is pending on the socket.
    Errored,
}

/// Readiness query on the socket behind a connection.
pub trait Poll {
    /// Block until the socket is ready for `interest`, an error is pending, or
    /// `timeout_ms` elapses.
    fn poll_ready(&mut self, interest: Interest, timeout_ms: u32) -> Readiness;
}

/// A connect-only socket: raw non-blocking send/receive plus readiness.
pub trait Connection: Read + Write + Close + Poll {}

/// Opens connect-only sockets.
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: error::Error;
    /// Open a connection to the host named by `url`.
    ///
    /// Name resolution failures should be reported as
    /// [`error::ErrorKind::HostNotFound`] so callers can tell them apart.
    fn connect(&mut self, url: &Url<'_>) -> Result<Self::Connection, Self::Error>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for Interest {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Interest::Readable => defmt::write!(f, "Readable"),
            Interest::Writable => defmt::write!(f, "Writable"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Readiness {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Readiness::Ready => defmt::write!(f, "Ready"),
            Readiness::TimedOut => defmt::write!(f, "TimedOut"),
            Readiness::Errored => defmt::write!(f, "Errored"),
        }
    }
}
