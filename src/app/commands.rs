//! Inbound commands parsed from one protocol line.
//!
//! Parsing and validation happen here, completely, before anything is
//! applied.  A [`Command`] therefore always carries arguments that are
//! safe to hand to the drivers.

use core::num::IntErrorKind;

use crate::error::ProtocolError;

use super::state::{FanBank, LedBank, LedColor, FAN_COUNT, INDICATOR_COUNT};

/// Commands the host can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `SETF f1 f2 f3 f4 big`
    SetFans(FanBank),
    /// `SETL c1 c2 c3 c4`
    SetLeds(LedBank),
    /// `SETALL f1 f2 f3 f4 big c1 c2 c3 c4`
    SetAll(FanBank, LedBank),
    /// `GET?`
    GetState,
    /// Any other keyword.
    Unknown,
}

impl Command {
    /// Parse a trimmed, non-blank line.
    ///
    /// Keywords are case-sensitive.  Arguments are checked in the fixed
    /// order count → integer syntax → range → colour, and the first
    /// failing check decides the error.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut tokens = line.split_ascii_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(Self::Unknown);
        };

        match keyword {
            "SETF" => {
                let args = collect_args::<FAN_COUNT>(tokens)?;
                Ok(Self::SetFans(parse_fans(&args)?))
            }
            "SETL" => {
                let args = collect_args::<INDICATOR_COUNT>(tokens)?;
                Ok(Self::SetLeds(parse_leds(&args)?))
            }
            "SETALL" => {
                let args = collect_args::<{ FAN_COUNT + INDICATOR_COUNT }>(tokens)?;
                let (fan_args, led_args) = args.split_at(FAN_COUNT);
                let fans = parse_fans(fan_args)?;
                let leds = parse_leds(led_args)?;
                Ok(Self::SetAll(fans, leds))
            }
            // Never fails: trailing tokens are ignored.
            "GET?" => Ok(Self::GetState),
            _ => Ok(Self::Unknown),
        }
    }
}

/// Take exactly `N` tokens.
fn collect_args<'a, const N: usize>(
    tokens: impl Iterator<Item = &'a str>,
) -> Result<heapless::Vec<&'a str, N>, ProtocolError> {
    let mut args = heapless::Vec::new();
    for token in tokens {
        args.push(token).map_err(|_| ProtocolError::BadArgs)?;
    }
    if args.len() != N {
        return Err(ProtocolError::BadArgs);
    }
    Ok(args)
}

/// All tokens must be integers before any range is looked at.
fn parse_fans(args: &[&str]) -> Result<FanBank, ProtocolError> {
    let mut values = [0i32; FAN_COUNT];
    let mut overflowed = false;
    for (value, token) in values.iter_mut().zip(args) {
        match token.parse::<i32>() {
            Ok(v) => *value = v,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                overflowed = true;
                *value = i32::MAX;
            }
            Err(_) => return Err(ProtocolError::BadArgs),
        }
    }
    if overflowed {
        return Err(ProtocolError::OutOfRange);
    }
    FanBank::try_from_values(values)
}

fn parse_leds(args: &[&str]) -> Result<LedBank, ProtocolError> {
    let mut leds = [LedColor::Off; INDICATOR_COUNT];
    for (led, token) in leds.iter_mut().zip(args) {
        *led = token.parse()?;
    }
    Ok(leds)
}
