use libhttp::network::error::ErrorKind;
use libhttp::network::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub mod framing;

/// One scripted socket outcome.
#[derive(Debug, Clone)]
pub enum Step {
    Data(Vec<u8>),
    WouldBlock,
    Fail(ErrorKind),
}

/// What the engine did to the mock, inspectable after the connection is gone.
#[derive(Debug, Default)]
pub struct Wire {
    pub written: Vec<u8>,
    pub write_calls: Vec<usize>,
    pub polls: Vec<(Interest, u32)>,
    pub connected_to: Option<(String, u16)>,
    pub closed: bool,
}

impl Wire {
    pub fn written_str(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }
}

#[derive(Debug)]
pub struct MockConnection {
    reads: VecDeque<Step>,
    writes: VecDeque<Step>,
    readiness: VecDeque<Readiness>,
    write_limit: usize,
    wire: Rc<RefCell<Wire>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            reads: VecDeque::new(),
            writes: VecDeque::new(),
            readiness: VecDeque::new(),
            write_limit: usize::MAX,
            wire: Rc::default(),
        }
    }

    /// Queue bytes for a single read; a short read buffer leaves the rest queued.
    pub fn respond(mut self, bytes: &[u8]) -> Self {
        self.reads.push_back(Step::Data(bytes.to_vec()));
        self
    }

    /// Queue `bytes` as separate reads of at most `size` bytes each.
    pub fn respond_in_pieces(mut self, bytes: &[u8], size: usize) -> Self {
        for piece in bytes.chunks(size) {
            self.reads.push_back(Step::Data(piece.to_vec()));
        }
        self
    }

    pub fn read_step(mut self, step: Step) -> Self {
        self.reads.push_back(step);
        self
    }

    pub fn write_step(mut self, step: Step) -> Self {
        self.writes.push_back(step);
        self
    }

    pub fn readiness(mut self, readiness: Readiness) -> Self {
        self.readiness.push_back(readiness);
        self
    }

    /// Accept at most `limit` bytes per write call.
    pub fn write_limit(mut self, limit: usize) -> Self {
        self.write_limit = limit;
        self
    }
}

impl Read for MockConnection {
    type Error = ErrorKind;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.reads.pop_front() {
            None => Ok(0),
            Some(Step::WouldBlock) => Err(ErrorKind::WouldBlock),
            Some(Step::Fail(kind)) => Err(kind),
            Some(Step::Data(mut bytes)) => {
                let len = buf.len().min(bytes.len());
                buf[..len].copy_from_slice(&bytes[..len]);
                let rest = bytes.split_off(len);
                if !rest.is_empty() {
                    self.reads.push_front(Step::Data(rest));
                }
                Ok(len)
            }
        }
    }
}

impl Write for MockConnection {
    type Error = ErrorKind;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        match self.writes.pop_front() {
            Some(Step::WouldBlock) => return Err(ErrorKind::WouldBlock),
            Some(Step::Fail(kind)) => return Err(kind),
            _ => {}
        }
        let len = buf.len().min(self.write_limit);
        let mut wire = self.wire.borrow_mut();
        wire.written.extend_from_slice(&buf[..len]);
        wire.write_calls.push(len);
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = ErrorKind;

    fn close(self) -> Result<(), Self::Error> {
        self.wire.borrow_mut().closed = true;
        Ok(())
    }
}

impl Poll for MockConnection {
    fn poll_ready(&mut self, interest: Interest, timeout_ms: u32) -> Readiness {
        self.wire.borrow_mut().polls.push((interest, timeout_ms));
        self.readiness.pop_front().unwrap_or(Readiness::Ready)
    }
}

impl Connection for MockConnection {}

/// Hands out one scripted connection, or fails with a fixed error.
#[derive(Debug)]
pub struct MockNetwork {
    connection: Option<MockConnection>,
    failure: Option<ErrorKind>,
    wire: Rc<RefCell<Wire>>,
}

impl MockNetwork {
    pub fn new(connection: MockConnection) -> (Self, Rc<RefCell<Wire>>) {
        let wire = connection.wire.clone();
        let network = Self {
            connection: Some(connection),
            failure: None,
            wire: wire.clone(),
        };
        (network, wire)
    }

    pub fn failing(kind: ErrorKind) -> (Self, Rc<RefCell<Wire>>) {
        let wire: Rc<RefCell<Wire>> = Rc::default();
        let network = Self {
            connection: None,
            failure: Some(kind),
            wire: wire.clone(),
        };
        (network, wire)
    }
}

impl Connect for MockNetwork {
    type Connection = MockConnection;
    type Error = ErrorKind;

    fn connect(&mut self, url: &Url<'_>) -> Result<Self::Connection, Self::Error> {
        if let Some(kind) = self.failure {
            return Err(kind);
        }
        self.wire.borrow_mut().connected_to = Some((url.host().to_string(), url.port()));
        self.connection.take().ok_or(ErrorKind::NotOpen)
    }
}

#[test]
fn test_mock_read_splits_queued_data() {
    let mut conn = MockConnection::new().respond(b"abcdef");
    let mut buf = [0; 4];
    assert_eq!(conn.read(&mut buf), Ok(4));
    assert_eq!(&buf, b"abcd");
    assert_eq!(conn.read(&mut buf), Ok(2));
    assert_eq!(&buf[..2], b"ef");
    assert_eq!(conn.read(&mut buf), Ok(0));
}

#[test]
fn test_mock_write_limit_and_scripted_errors() {
    let mut conn = MockConnection::new()
        .write_limit(3)
        .write_step(Step::WouldBlock);
    assert_eq!(conn.write(b"hello"), Err(ErrorKind::WouldBlock));
    assert_eq!(conn.write(b"hello"), Ok(3));
    assert_eq!(conn.wire.borrow().written, b"hel");
}
