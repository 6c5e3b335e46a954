//! Serial transport — the protocol channel.
//!
//! On ESP-IDF this is the protocol UART installed by
//! [`hw_init::init_protocol_uart`](crate::drivers::hw_init::init_protocol_uart),
//! read without blocking.  On the host the simulator speaks the protocol
//! over stdin/stdout: a reader thread forwards stdin chunks through a
//! channel so `read()` never blocks the serial loop.

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;
#[cfg(not(target_os = "espidf"))]
use std::io::{Read as _, Write as _};
#[cfg(not(target_os = "espidf"))]
use std::sync::mpsc::{self, Receiver, TryRecvError};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::protocol::transport::Transport;

/// Serial transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// Driver call failed (ESP-IDF return code, or -1 for host I/O).
    Io(i32),
}

impl core::fmt::Display for SerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(rc) => write!(f, "serial I/O failed (rc={})", rc),
        }
    }
}

impl std::error::Error for SerialError {}

pub struct SerialTransport {
    #[cfg(target_os = "espidf")]
    port: uart_port_t,
    #[cfg(not(target_os = "espidf"))]
    rx: Receiver<Vec<u8>>,
    #[cfg(not(target_os = "espidf"))]
    pending: VecDeque<u8>,
    #[cfg(not(target_os = "espidf"))]
    closed: bool,
}

impl SerialTransport {
    /// Wrap the already-installed protocol UART.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        Self {
            port: crate::pins::PROTOCOL_UART_PORT,
        }
    }

    /// Start the stdin reader thread.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut stdin = std::io::stdin().lock();
            let mut buf = [0u8; 256];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
            log::info!("serial(sim): stdin closed");
        });
        Self {
            rx,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// The host side hung up and every byte it sent has been read.
    /// Never true on the board.
    pub fn is_closed(&self) -> bool {
        #[cfg(target_os = "espidf")]
        {
            false
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.closed && self.pending.is_empty()
        }
    }

    // ── Platform helpers ──────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        // SAFETY: the UART driver was installed at boot; zero timeout
        // returns immediately with whatever is buffered.
        let n = unsafe { uart_read_bytes(self.port, buf.as_mut_ptr().cast(), buf.len() as u32, 0) };
        if n < 0 {
            return Err(SerialError::Io(n));
        }
        Ok(n as usize)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        loop {
            match self.rx.try_recv() {
                Ok(chunk) => self.pending.extend(chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    #[cfg(target_os = "espidf")]
    fn platform_write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        // SAFETY: copies into the driver's TX FIFO, blocking until queued.
        let n = unsafe { uart_write_bytes(self.port, data.as_ptr().cast(), data.len()) };
        if n < 0 {
            return Err(SerialError::Io(n));
        }
        Ok(n as usize)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        std::io::stdout().write(data).map_err(|_| SerialError::Io(-1))
    }

    #[cfg(target_os = "espidf")]
    fn platform_flush(&mut self) -> Result<(), SerialError> {
        // The driver drains its FIFO on its own.
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_flush(&mut self) -> Result<(), SerialError> {
        std::io::stdout().flush().map_err(|_| SerialError::Io(-1))
    }
}

impl Default for SerialTransport {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Transport implementation
// ───────────────────────────────────────────────────────────────

impl Transport for SerialTransport {
    type Error = SerialError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        self.platform_read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        self.platform_write(data)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.platform_flush()
    }
}
