//! Error types for HTTP exchanges

use crate::network::error::ErrorKind;

/// Everything that can abort an HTTP exchange.
///
/// Any error leaves the session unusable; there is no retry at this layer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The target host name could not be resolved.
    HostResolution,
    /// Sending or receiving on the socket failed.
    Transport(TransportError),
    /// The peer sent bytes that are not valid HTTP/1.1 framing.
    ProtocolFraming(FramingError),
    /// The caller cancelled the exchange.
    Cancelled,
    /// Internal state was driven out of order. Indicates a bug, not bad input.
    InvariantViolation,
    /// The request URL could not be split into host and target.
    InvalidUrl,
    /// Session options could not be decoded.
    InvalidOptions,
    /// Request line and headers do not fit the request-head buffer.
    RequestTooLarge,
}

/// Socket-level failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransportError {
    /// The connection could not be established.
    Connect(ErrorKind),
    /// A send failed with something other than "would block".
    Send(ErrorKind),
    /// A receive failed with something other than "would block".
    Receive(ErrorKind),
    /// The socket did not become ready within the configured timeout.
    Timeout,
    /// The readiness wait itself reported an error on the socket.
    ReadinessFailed,
    /// The peer closed the connection before the message was complete.
    ConnectionClosed,
    /// Shutting the connection down failed.
    Shutdown(ErrorKind),
}

/// Malformed response framing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FramingError {
    /// The status line does not match `HTTP/<major>.<minor> <code> <reason>`.
    InvalidStatusLine,
    /// The version digits are not numeric.
    InvalidVersion,
    /// The status code is not a three-digit number.
    InvalidStatusCode,
    /// A header line has no `:` or is not valid UTF-8.
    InvalidHeader,
    /// A line is longer than the parser can carry across reads.
    HeaderTooLarge,
    /// More headers than the response can hold.
    TooManyHeaders,
    /// `content-length` is not a decimal integer.
    InvalidContentLength,
    /// A chunk-size line has no hex digits or overflows.
    InvalidChunkSize,
    /// Chunk data is not followed by CRLF.
    InvalidChunkTrailer,
}

impl Error {
    /// Map a connector failure, singling out name resolution.
    pub(crate) fn connect(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::HostNotFound => Error::HostResolution,
            kind => Error::Transport(TransportError::Connect(kind)),
        }
    }

    pub(crate) fn send<E: crate::network::error::Error>(error: &E) -> Self {
        Error::Transport(TransportError::Send(error.kind()))
    }

    pub(crate) fn receive<E: crate::network::error::Error>(error: &E) -> Self {
        Error::Transport(TransportError::Receive(error.kind()))
    }
}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        Error::Transport(error)
    }
}

impl From<FramingError> for Error {
    fn from(error: FramingError) -> Self {
        Error::ProtocolFraming(error)
    }
}

impl From<crate::network::url::InvalidUrl> for Error {
    fn from(_: crate::network::url::InvalidUrl) -> Self {
        Error::InvalidUrl
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::HostResolution => f.write_str("could not resolve host"),
            Error::Transport(e) => write!(f, "transport error: {e}"),
            Error::ProtocolFraming(e) => write!(f, "protocol framing error: {e}"),
            Error::Cancelled => f.write_str("operation cancelled"),
            Error::InvariantViolation => f.write_str("session driven out of order"),
            Error::InvalidUrl => f.write_str("invalid url"),
            Error::InvalidOptions => f.write_str("invalid session options"),
            Error::RequestTooLarge => f.write_str("request head too large"),
        }
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::Connect(kind) => write!(f, "connect failed: {kind}"),
            TransportError::Send(kind) => write!(f, "error while sending request: {kind}"),
            TransportError::Receive(kind) => {
                write!(f, "error while reading from network socket: {kind}")
            }
            TransportError::Timeout => f.write_str("timeout waiting for network socket"),
            TransportError::ReadinessFailed => f.write_str("socket reported an error while waiting"),
            TransportError::ConnectionClosed => f.write_str("connection closed mid-message"),
            TransportError::Shutdown(kind) => write!(f, "error while closing connection: {kind}"),
        }
    }
}

impl core::fmt::Display for FramingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            FramingError::InvalidStatusLine => "invalid status line",
            FramingError::InvalidVersion => "invalid http version",
            FramingError::InvalidStatusCode => "invalid status code",
            FramingError::InvalidHeader => "invalid header line",
            FramingError::HeaderTooLarge => "header line too large",
            FramingError::TooManyHeaders => "too many headers",
            FramingError::InvalidContentLength => "invalid content-length",
            FramingError::InvalidChunkSize => "invalid chunk size",
            FramingError::InvalidChunkTrailer => "chunk not terminated by CRLF",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::HostResolution => defmt::write!(f, "HostResolution"),
            Error::Transport(e) => defmt::write!(f, "Transport({})", e),
            Error::ProtocolFraming(e) => defmt::write!(f, "ProtocolFraming({})", e),
            Error::Cancelled => defmt::write!(f, "Cancelled"),
            Error::InvariantViolation => defmt::write!(f, "InvariantViolation"),
            Error::InvalidUrl => defmt::write!(f, "InvalidUrl"),
            Error::InvalidOptions => defmt::write!(f, "InvalidOptions"),
            Error::RequestTooLarge => defmt::write!(f, "RequestTooLarge"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransportError::Connect(kind) => defmt::write!(f, "Connect({})", kind),
            TransportError::Send(kind) => defmt::write!(f, "Send({})", kind),
            TransportError::Receive(kind) => defmt::write!(f, "Receive({})", kind),
            TransportError::Timeout => defmt::write!(f, "Timeout"),
            TransportError::ReadinessFailed => defmt::write!(f, "ReadinessFailed"),
            TransportError::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            TransportError::Shutdown(kind) => defmt::write!(f, "Shutdown({})", kind),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FramingError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            FramingError::InvalidStatusLine => defmt::write!(f, "InvalidStatusLine"),
            FramingError::InvalidVersion => defmt::write!(f, "InvalidVersion"),
            FramingError::InvalidStatusCode => defmt::write!(f, "InvalidStatusCode"),
            FramingError::InvalidHeader => defmt::write!(f, "InvalidHeader"),
            FramingError::HeaderTooLarge => defmt::write!(f, "HeaderTooLarge"),
            FramingError::TooManyHeaders => defmt::write!(f, "TooManyHeaders"),
            FramingError::InvalidContentLength => defmt::write!(f, "InvalidContentLength"),
            FramingError::InvalidChunkSize => defmt::write!(f, "InvalidChunkSize"),
            FramingError::InvalidChunkTrailer => defmt::write!(f, "InvalidChunkTrailer"),
        }
    }
}
