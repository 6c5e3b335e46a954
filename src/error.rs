//! Unified error types for the FanLed firmware.
//!
//! Protocol errors are the four per-line conditions the host bridge knows
//! by name.  They never reach the hardware layer and never halt the control
//! loop.  Boot-time failures (timer maths, configuration, peripheral init)
//! funnel into the firmware-wide [`Error`].

use core::fmt;

use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;
use crate::drivers::primary_fan::TimingError;

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

/// A command line that was received but cannot be executed.
///
/// Checks run in the order count → range → colour and the first failing
/// check is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Wrong token count, or a numeric token that is not an integer.
    BadArgs,
    /// A duty value outside 0..=100.
    OutOfRange,
    /// A colour token outside {R, G, B, W, OFF}.
    BadColor,
    /// Unrecognised command keyword.
    UnknownCmd,
}

impl ProtocolError {
    /// Wire name of the error class, as sent after `ERR:`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::BadArgs => "BAD_ARGS",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::BadColor => "BAD_COLOR",
            Self::UnknownCmd => "UNKNOWN_CMD",
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERR:{}", self.code())
    }
}

impl std::error::Error for ProtocolError {}

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Everything that can stop the firmware from booting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The primary carrier cannot be generated from the timer clock.
    Timing(TimingError),
    /// Configuration failed validation or could not be parsed.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timing(e) => write!(f, "timing: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TimingError> for Error {
    fn from(e: TimingError) -> Self {
        Self::Timing(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
