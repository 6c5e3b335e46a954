//! Firmware configuration parameters
//!
//! All tunables for the FanLed board.  Nothing here is persisted: the
//! values are compiled in, and the host simulator can override them from a
//! JSON file at startup.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::drivers::primary_fan::CarrierTiming;

/// Core firmware configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    // --- Serial ---
    /// Protocol UART baud rate (8N1)
    pub baud_rate: u32,

    // --- Primary fan carrier ---
    /// Input clock of the primary fan's compare timer, no prescaler (Hz)
    pub primary_timer_clock_hz: u32,
    /// Requested carrier frequency for the primary fan (Hz)
    pub primary_carrier_hz: u32,

    // --- Indicators ---
    /// Board has the green and blue indicator lines exchanged
    pub swap_green_blue: bool,

    // --- Timing ---
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
    /// Sleep between polls when no serial input is pending (milliseconds)
    pub idle_poll_ms: u32,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            // Serial
            baud_rate: 115_200,

            // Primary fan: MCPWM group clock, 80 MHz / 25 kHz = 3200 ticks
            primary_timer_clock_hz: 80_000_000,
            primary_carrier_hz: 25_000,

            // Indicators
            swap_green_blue: false,

            // Timing
            watchdog_timeout_ms: 5_000,
            idle_poll_ms: 1,
        }
    }
}

impl FirmwareConfig {
    /// Parse a (possibly partial) JSON override.  Missing fields keep their
    /// default values.  The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the firmware cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be non-zero"));
        }
        if CarrierTiming::for_clock(self.primary_timer_clock_hz, self.primary_carrier_hz).is_err()
        {
            return Err(ConfigError::ValidationFailed(
                "primary carrier not reachable from timer clock",
            ));
        }
        if self.watchdog_timeout_ms <= self.idle_poll_ms {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must exceed idle_poll_ms",
            ));
        }
        Ok(())
    }

    /// Carrier timing derived from the configured clock and frequency.
    pub fn carrier_timing(&self) -> Result<CarrierTiming, crate::drivers::primary_fan::TimingError> {
        CarrierTiming::for_clock(self.primary_timer_clock_hz, self.primary_carrier_hz)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override file is not valid JSON for this schema.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
