//! Plain TCP connector over `std::net`.
//!
//! Streams are switched to non-blocking mode right after connecting, so reads
//! and writes surface `WouldBlock` and the HTTP engine waits through
//! [`Poll::poll_ready`], which is backed by the `polling` crate.

use super::error::ErrorKind;
use super::{Close, Connect, Connection, Interest, Poll, Read, Readiness, Url, Write};
use polling::{Event, Poller};
use std::io::{self, Read as _, Write as _};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

const POLL_KEY: usize = 7;

/// Opens plain-text TCP connections for `http://` URLs.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    connect_timeout: Option<Duration>,
}

impl TcpConnector {
    /// A connector that waits as long as the OS allows for each connect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every connect attempt.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = ErrorKind;

    fn connect(&mut self, url: &Url<'_>) -> Result<Self::Connection, Self::Error> {
        if !url.scheme().eq_ignore_ascii_case("http") {
            return Err(ErrorKind::InvalidAddress);
        }

        let host = url.host().trim_start_matches('[').trim_end_matches(']');
        let addrs = (host, url.port())
            .to_socket_addrs()
            .map_err(|_| ErrorKind::HostNotFound)?;

        let mut last_error = ErrorKind::HostNotFound;
        for addr in addrs {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    return TcpConnection::new(stream).map_err(|e| super::error::Error::kind(&e));
                }
                Err(e) => last_error = super::error::Error::kind(&e),
            }
        }
        Err(last_error)
    }
}

/// A connected, non-blocking TCP stream.
pub struct TcpConnection {
    stream: TcpStream,
    poller: Poller,
    registered: bool,
}

impl core::fmt::Debug for TcpConnection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TcpConnection")
            .field("stream", &self.stream)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

impl TcpConnection {
    /// Wrap an already-connected stream, switching it to non-blocking mode.
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            poller: Poller::new()?,
            registered: false,
        })
    }

    fn wait(&mut self, interest: Interest, timeout_ms: u32) -> io::Result<usize> {
        let event = match interest {
            Interest::Readable => Event::readable(POLL_KEY),
            Interest::Writable => Event::writable(POLL_KEY),
        };
        // interest is oneshot, so re-arm on every wait
        if self.registered {
            self.poller.modify(&self.stream, event)?;
        } else {
            self.poller.add(&self.stream, event)?;
            self.registered = true;
        }

        let mut events = Vec::new();
        self.poller.wait(
            &mut events,
            Some(Duration::from_millis(u64::from(timeout_ms))),
        )
    }
}

impl Read for TcpConnection {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.stream.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

impl Write for TcpConnection {
    type Error = io::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        loop {
            match self.stream.write(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush()
    }
}

impl Close for TcpConnection {
    type Error = io::Error;

    fn close(self) -> Result<(), Self::Error> {
        if self.registered {
            self.poller.delete(&self.stream)?;
        }
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl Poll for TcpConnection {
    fn poll_ready(&mut self, interest: Interest, timeout_ms: u32) -> Readiness {
        match self.wait(interest, timeout_ms) {
            Ok(0) => Readiness::TimedOut,
            Ok(_) => Readiness::Ready,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Readiness::Ready,
            Err(_) => Readiness::Errored,
        }
    }
}

impl Connection for TcpConnection {}
