//! Newline-delimited line reader.
//!
//! Pulls bytes from a [`Transport`] one at a time, so anything after a
//! terminator stays in the transport for the next poll.  The buffer is a
//! fixed-capacity `heapless::Vec`: a line that does not fit is rejected as
//! a whole rather than truncated.  Leading blanks are skipped and blanks
//! beyond capacity are dropped, so only lines with more than `N` bytes of
//! actual content overflow.
//!
//! ```text
//!  bytes ──▶ [ \r dropped ] ──▶ buffer ──\n──▶ Line(&[u8])
//!                                  │
//!                                full ──▶ discard to \n ──▶ Overflow
//! ```

use heapless::Vec;

use super::transport::Transport;

/// Longest accepted line, terminator excluded.  The longest valid command,
/// `SETALL 100 100 100 100 100 OFF OFF OFF OFF`, is 42 bytes.
pub const MAX_LINE_LEN: usize = 64;

/// Result of a poll that completed a line.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome<'a> {
    /// A complete line, terminator and carriage returns removed.
    Line(&'a [u8]),
    /// A line longer than the capacity was dropped.
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Accumulating a line.
    Collecting,
    /// Last poll returned the buffer contents; clear before reuse.
    Delivered,
    /// Capacity exceeded; drop bytes until the next terminator.
    Discarding,
}

/// Streaming line assembler.
pub struct LineReader<const N: usize = MAX_LINE_LEN> {
    buf: Vec<u8, N>,
    state: ReaderState,
}

impl<const N: usize> Default for LineReader<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineReader<N> {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            state: ReaderState::Collecting,
        }
    }

    /// Consume buffered bytes until a line completes or the transport runs
    /// dry.
    ///
    /// Returns `Ok(None)` when no terminator has arrived yet; the partial
    /// line is kept for the next call.  A returned line borrows the reader
    /// and is valid until the next call.
    pub fn poll<T: Transport>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<ReadOutcome<'_>>, T::Error> {
        if self.state == ReaderState::Delivered {
            self.buf.clear();
            self.state = ReaderState::Collecting;
        }

        let mut byte = [0u8; 1];
        while transport.read(&mut byte)? == 1 {
            if let Some(done) = self.push(byte[0]) {
                return Ok(Some(match done {
                    Completed::Line => ReadOutcome::Line(self.buf.as_slice()),
                    Completed::Overflow => ReadOutcome::Overflow,
                }));
            }
        }
        Ok(None)
    }

    /// Bytes of the current partial line.
    pub fn pending_len(&self) -> usize {
        match self.state {
            ReaderState::Collecting => self.buf.len(),
            ReaderState::Delivered | ReaderState::Discarding => 0,
        }
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = ReaderState::Collecting;
    }

    fn push(&mut self, byte: u8) -> Option<Completed> {
        match (byte, self.state) {
            (b'\r', _) => None,
            (b'\n', ReaderState::Discarding) => {
                self.buf.clear();
                self.state = ReaderState::Collecting;
                Some(Completed::Overflow)
            }
            (b'\n', _) => {
                self.state = ReaderState::Delivered;
                Some(Completed::Line)
            }
            (_, ReaderState::Discarding) => None,
            // Leading blanks are never buffered, so a blank line of any
            // length still arrives as an empty line.
            (_, _) if self.buf.is_empty() && byte.is_ascii_whitespace() => None,
            (_, _) => {
                if self.buf.push(byte).is_err() {
                    // Trailing blanks past capacity carry no tokens.
                    if byte.is_ascii_whitespace() {
                        return None;
                    }
                    log::warn!("line reader: line exceeds {} bytes, discarding", N);
                    self.buf.clear();
                    self.state = ReaderState::Discarding;
                }
                None
            }
        }
    }
}

enum Completed {
    Line,
    Overflow,
}
