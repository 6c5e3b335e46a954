//! Device State — the single in-memory record of what the outputs show.
//!
//! [`FanBank`] and [`LedColor`] can only hold valid values: a duty outside
//! 0..=100 or an unknown colour token is rejected while parsing, so the
//! drivers never see an invalid request.

use core::fmt;
use core::str::FromStr;

use crate::error::ProtocolError;

/// Number of auxiliary fans (bank index 0..3).
pub const AUX_FAN_COUNT: usize = 4;
/// Total fans in the bank, auxiliary plus primary.
pub const FAN_COUNT: usize = AUX_FAN_COUNT + 1;
/// Bank index of the primary fan.
pub const PRIMARY_FAN_INDEX: usize = AUX_FAN_COUNT;
/// Number of RGB indicators.
pub const INDICATOR_COUNT: usize = 4;
/// Highest accepted duty, in percent.
pub const MAX_DUTY_PERCENT: u8 = 100;

// ───────────────────────────────────────────────────────────────
// FanBank
// ───────────────────────────────────────────────────────────────

/// Duty values in percent: four auxiliary fans followed by the primary fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanBank([u8; FAN_COUNT]);

impl FanBank {
    /// All fans stopped.
    pub const fn stopped() -> Self {
        Self([0; FAN_COUNT])
    }

    /// Range-check five raw values.
    pub fn try_from_values(values: [i32; FAN_COUNT]) -> Result<Self, ProtocolError> {
        let mut duties = [0u8; FAN_COUNT];
        for (slot, value) in duties.iter_mut().zip(values) {
            *slot = u8::try_from(value)
                .ok()
                .filter(|d| *d <= MAX_DUTY_PERCENT)
                .ok_or(ProtocolError::OutOfRange)?;
        }
        Ok(Self(duties))
    }

    /// Auxiliary duties, channel 0..3.
    pub fn aux(&self) -> &[u8] {
        &self.0[..AUX_FAN_COUNT]
    }

    /// Primary fan duty.
    pub fn primary(&self) -> u8 {
        self.0[PRIMARY_FAN_INDEX]
    }

    pub fn as_array(&self) -> [u8; FAN_COUNT] {
        self.0
    }
}

impl fmt::Display for FanBank {
    /// `f1,f2,f3,f4,big`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, duty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{duty}")?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// LedColor
// ───────────────────────────────────────────────────────────────

/// One indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Green,
    Blue,
    White,
}

impl LedColor {
    pub const ALL: [Self; 5] = [Self::Off, Self::Red, Self::Green, Self::Blue, Self::White];

    /// Canonical upper-case wire token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Red => "R",
            Self::Green => "G",
            Self::Blue => "B",
            Self::White => "W",
        }
    }

    /// `(red, green, blue)` line levels; `true` lights the line.
    pub const fn lines(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Red => (true, false, false),
            Self::Green => (false, true, false),
            Self::Blue => (false, false, true),
            Self::White => (true, true, true),
        }
    }
}

impl FromStr for LedColor {
    type Err = ProtocolError;

    /// Case-insensitive match against the five wire tokens.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.token().eq_ignore_ascii_case(token))
            .ok_or(ProtocolError::BadColor)
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Colours of the four indicators.
pub type LedBank = [LedColor; INDICATOR_COUNT];

/// Writes `c1,c2,c3,c4`.
pub struct LedList<'a>(pub &'a LedBank);

impl fmt::Display for LedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(color.token())?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// DeviceState
// ───────────────────────────────────────────────────────────────

/// Fan duties and indicator colours as last committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    pub fans: FanBank,
    pub leds: LedBank,
}

impl DeviceState {
    /// Power-on state: every fan at 0 %, every indicator off.
    pub const fn power_on() -> Self {
        Self {
            fans: FanBank::stopped(),
            leds: [LedColor::Off; INDICATOR_COUNT],
        }
    }
}
