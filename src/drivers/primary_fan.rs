//! Primary fan driver — fixed 25 kHz carrier, active-low duty.
//!
//! The fan's PWM input is pulled by an open-drain transistor, so the pin
//! level is the inverse of what the fan sees.  A requested duty of `p` %
//! therefore loads a compare value of `round(period * (100 - p) / 100)`:
//! 0 % gives the full period (output never cleared), 100 % gives 0.
//!
//! The timer runs in fast-PWM style: output set when the counter wraps to
//! zero, cleared on compare match, no prescaler.  The period is derived
//! from the timer clock instead of being hard-coded:
//!
//! | Timer clock | Period (ticks) | Carrier |
//! |-------------|----------------|---------|
//! | 16 MHz (AVR Timer1) | 640 | 25.000 kHz |
//! | 80 MHz (ESP32-S3 MCPWM) | 3200 | 25.000 kHz |
//!
//! ## Safety contract
//!
//! This driver does not range-check.  Callers pass 0..=100 only.

use core::fmt;

use log::info;

/// Fewer ticks than this cannot resolve 1 % steps.
pub const MIN_PERIOD_TICKS: u32 = 100;

// ── Hardware seam ─────────────────────────────────────────────

/// A 16-bit up-counting timer with one compare output.
pub trait CompareTimer {
    /// Load the period (ticks per carrier cycle), enable the compare
    /// output and start counting.
    fn configure(&mut self, period: u16);

    /// Load a new compare value.  `ticks >= period` keeps the output set
    /// for the whole cycle; `0` keeps it cleared.
    fn set_compare(&mut self, ticks: u16);
}

// ── Carrier timing ────────────────────────────────────────────

/// Period derived from a timer clock and a requested carrier frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierTiming {
    timer_clock_hz: u32,
    period: u16,
}

impl CarrierTiming {
    pub fn for_clock(timer_clock_hz: u32, carrier_hz: u32) -> Result<Self, TimingError> {
        if carrier_hz == 0 {
            return Err(TimingError::ZeroCarrier);
        }
        let ticks = timer_clock_hz / carrier_hz;
        if ticks < MIN_PERIOD_TICKS {
            return Err(TimingError::PeriodTooShort { ticks });
        }
        let period = u16::try_from(ticks).map_err(|_| TimingError::PeriodTooLong { ticks })?;
        Ok(Self {
            timer_clock_hz,
            period,
        })
    }

    /// Ticks per carrier cycle.
    pub fn period(&self) -> u16 {
        self.period
    }

    pub fn timer_clock_hz(&self) -> u32 {
        self.timer_clock_hz
    }

    /// Frequency actually produced, which differs from the request when
    /// the clock is not an exact multiple of it.
    pub fn actual_carrier_hz(&self) -> u32 {
        self.timer_clock_hz / u32::from(self.period)
    }

    /// Compare value for `percent`, inverted for the open-drain stage.
    pub fn inverted_compare(&self, percent: u8) -> u16 {
        let off_share = u32::from(100u8.saturating_sub(percent));
        ((u32::from(self.period) * off_share + 50) / 100) as u16
    }
}

/// The requested carrier cannot be generated from the timer clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingError {
    ZeroCarrier,
    /// Below [`MIN_PERIOD_TICKS`].
    PeriodTooShort { ticks: u32 },
    /// Does not fit the 16-bit period register.
    PeriodTooLong { ticks: u32 },
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCarrier => write!(f, "carrier frequency is zero"),
            Self::PeriodTooShort { ticks } => {
                write!(f, "period of {} ticks is below {}", ticks, MIN_PERIOD_TICKS)
            }
            Self::PeriodTooLong { ticks } => {
                write!(f, "period of {} ticks exceeds 16-bit timer", ticks)
            }
        }
    }
}

impl std::error::Error for TimingError {}

// ── Driver ────────────────────────────────────────────────────

pub struct PrimaryFan<T: CompareTimer> {
    timer: T,
    timing: CarrierTiming,
    duty: u8,
    compare: u16,
}

impl<T: CompareTimer> PrimaryFan<T> {
    /// One-time timer setup.  The fan starts at 0 % (output held set).
    ///
    /// This is the only constructor, so a duty can never be requested from
    /// an unconfigured timer.
    pub fn configure(mut timer: T, timing: CarrierTiming) -> Self {
        timer.configure(timing.period());
        let compare = timing.inverted_compare(0);
        timer.set_compare(compare);
        info!(
            "primary fan: period={} ticks @ {} Hz clock -> {} Hz carrier",
            timing.period(),
            timing.timer_clock_hz(),
            timing.actual_carrier_hz()
        );
        Self {
            timer,
            timing,
            duty: 0,
            compare,
        }
    }

    pub fn set_duty(&mut self, percent: u8) {
        let compare = self.timing.inverted_compare(percent);
        self.timer.set_compare(compare);
        self.duty = percent;
        self.compare = compare;
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Compare value last loaded into the timer.
    pub fn compare(&self) -> u16 {
        self.compare
    }

    pub fn timing(&self) -> CarrierTiming {
        self.timing
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
