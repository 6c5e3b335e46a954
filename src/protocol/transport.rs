//! Transport abstraction — any byte-oriented channel.
//!
//! Concrete implementations:
//! - `adapters::serial::SerialTransport`: the protocol UART on ESP32-S3,
//!   stdin/stdout on the host
//! - [`MemoryTransport`] for tests and fuzzing
//!
//! The line reader and the control loop are generic over `Transport`.

use std::collections::VecDeque;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Write all of `data`, retrying short writes.
pub fn write_all<T: Transport>(transport: &mut T, mut data: &[u8]) -> Result<(), T::Error> {
    while !data.is_empty() {
        let n = transport.write(data)?;
        if n == 0 {
            // Nothing accepted; caller sees the flush result.
            break;
        }
        data = &data[n..];
    }
    transport.flush()
}

/// In-memory transport: bytes pushed with [`inject`](Self::inject) are read
/// back in order, written bytes collect in [`output`](Self::output).
#[derive(Debug, Default)]
pub struct MemoryTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if they had arrived on the wire.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Everything written so far.
    pub fn output(&self) -> &[u8] {
        &self.tx
    }

    /// Written bytes split into lines (terminators removed).
    pub fn output_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.tx)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Drop everything written so far.
    pub fn clear_output(&mut self) {
        self.tx.clear();
    }

    /// Bytes still waiting to be read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Transport for MemoryTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.rx.pop_front() {
                Some(b) => {
                    *slot = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
