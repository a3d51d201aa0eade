//! Common error types for socket operations

/// The kind of failure reported by a socket primitive.
///
/// This enum defines a set of common errors that can occur when working with
/// non-blocking sockets. It is designed to be simple and portable for `no_std`
/// environments, and doubles as a ready-made error type for connection
/// implementations that have nothing richer to report.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// No bytes could be moved right now; wait for readiness and retry.
    WouldBlock,
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A connection attempt was refused.
    ConnectionRefused,
    /// The remote host name could not be resolved.
    HostNotFound,
    /// A timeout occurred.
    Timeout,
    /// The connection was closed.
    ConnectionClosed,
    /// An invalid address was provided.
    InvalidAddress,
    /// Any other failure.
    Other,
}

/// An error produced by a socket primitive.
pub trait Error: core::fmt::Debug {
    /// Classify this error.
    fn kind(&self) -> ErrorKind;

    /// Whether this error is the "try again" signal rather than a failure.
    fn would_block(&self) -> bool {
        self.kind() == ErrorKind::WouldBlock
    }
}

impl Error for ErrorKind {
    fn kind(&self) -> ErrorKind {
        *self
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            ErrorKind::WouldBlock => "operation would block",
            ErrorKind::NotOpen => "connection not open",
            ErrorKind::WriteError => "write failed",
            ErrorKind::ReadError => "read failed",
            ErrorKind::ConnectionRefused => "connection refused",
            ErrorKind::HostNotFound => "host not found",
            ErrorKind::Timeout => "timed out",
            ErrorKind::ConnectionClosed => "connection closed",
            ErrorKind::InvalidAddress => "invalid address",
            ErrorKind::Other => "socket error",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "std")]
impl Error for std::io::Error {
    fn kind(&self) -> ErrorKind {
        use std::io::ErrorKind as Io;
        match std::io::Error::kind(self) {
            Io::WouldBlock => ErrorKind::WouldBlock,
            Io::TimedOut => ErrorKind::Timeout,
            Io::ConnectionRefused => ErrorKind::ConnectionRefused,
            Io::ConnectionReset | Io::ConnectionAborted | Io::BrokenPipe | Io::UnexpectedEof => {
                ErrorKind::ConnectionClosed
            }
            Io::NotConnected => ErrorKind::NotOpen,
            Io::InvalidInput | Io::AddrNotAvailable => ErrorKind::InvalidAddress,
            _ => ErrorKind::Other,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ErrorKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ErrorKind::WouldBlock => defmt::write!(f, "WouldBlock"),
            ErrorKind::NotOpen => defmt::write!(f, "NotOpen"),
            ErrorKind::WriteError => defmt::write!(f, "WriteError"),
            ErrorKind::ReadError => defmt::write!(f, "ReadError"),
            ErrorKind::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            ErrorKind::HostNotFound => defmt::write!(f, "HostNotFound"),
            ErrorKind::Timeout => defmt::write!(f, "Timeout"),
            ErrorKind::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            ErrorKind::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            ErrorKind::Other => defmt::write!(f, "Other"),
        }
    }
}
