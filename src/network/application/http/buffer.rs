//! The session's shared read buffer.

/// Default read-buffer capacity of a session.
pub const DEFAULT_READER_SIZE: usize = 1024;

/// A fixed array, its fill length, and a cursor to the first unread byte.
///
/// The cursor is an index, never an address, so refilling in place cannot
/// leave it dangling; `None` means every filled byte has been consumed.
#[derive(Debug)]
pub(crate) struct ReadBuffer<const N: usize> {
    data: [u8; N],
    filled: usize,
    cursor: Option<usize>,
}

impl<const N: usize> ReadBuffer<N> {
    pub(crate) const fn new() -> Self {
        Self {
            data: [0; N],
            filled: 0,
            cursor: None,
        }
    }

    /// The whole backing array, for receiving a fresh fill into.
    pub(crate) fn spare(&mut self) -> &mut [u8] {
        self.cursor = None;
        self.filled = 0;
        &mut self.data
    }

    /// Record that `filled` bytes were received, starting unread at `cursor`.
    pub(crate) fn set_filled(&mut self, filled: usize, cursor: usize) {
        self.filled = filled.min(N);
        self.cursor = (cursor < self.filled).then_some(cursor);
    }

    /// The most recent fill, consumed or not.
    pub(crate) fn filled(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Unread bytes of the current fill; empty once consumed.
    pub(crate) fn unread(&self) -> &[u8] {
        match self.cursor {
            Some(at) => &self.data[at..self.filled],
            None => &[],
        }
    }

    pub(crate) fn has_unread(&self) -> bool {
        self.cursor.is_some()
    }

    /// Mark `count` unread bytes as consumed.
    pub(crate) fn consume(&mut self, count: usize) {
        if let Some(at) = self.cursor {
            let next = at + count;
            self.cursor = (next < self.filled).then_some(next);
        }
    }

    /// Pop the next unread byte.
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.unread().first()?;
        self.consume(1);
        Some(byte)
    }

    /// Mark everything consumed.
    pub(crate) fn discard(&mut self) {
        self.cursor = None;
    }
}
