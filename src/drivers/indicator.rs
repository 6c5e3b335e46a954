//! RGB indicator driver.
//!
//! Each indicator is three digital lines into a shared return; a high line
//! lights that component.  Colours are pure on/off mixes, no dimming:
//!
//! | Colour | R | G | B |
//! |--------|---|---|---|
//! | OFF    | 0 | 0 | 0 |
//! | R      | 1 | 0 | 0 |
//! | G      | 0 | 1 | 0 |
//! | B      | 0 | 0 | 1 |
//! | W      | 1 | 1 | 1 |
//!
//! Boards wired with green and blue exchanged set `swap_green_blue`; the
//! driver then drives the physical lines so the visible colour still
//! matches the requested one.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::state::{INDICATOR_COUNT, LedColor};

pub struct Indicator<L: OutputPin> {
    red: L,
    green: L,
    blue: L,
    swap_green_blue: bool,
    color: LedColor,
}

impl<L: OutputPin> Indicator<L> {
    /// Take the three lines and drive them low.
    pub fn new(red: L, green: L, blue: L, swap_green_blue: bool) -> Self {
        let mut ind = Self {
            red,
            green,
            blue,
            swap_green_blue,
            color: LedColor::Off,
        };
        ind.apply(LedColor::Off);
        ind
    }

    pub fn apply(&mut self, color: LedColor) {
        let (r, mut g, mut b) = color.lines();
        if self.swap_green_blue {
            core::mem::swap(&mut g, &mut b);
        }
        drive(&mut self.red, r);
        drive(&mut self.green, g);
        drive(&mut self.blue, b);
        self.color = color;
    }

    pub fn color(&self) -> LedColor {
        self.color
    }

    /// `(red, green, blue)` line handles.
    pub fn lines(&self) -> (&L, &L, &L) {
        (&self.red, &self.green, &self.blue)
    }
}

fn drive<L: OutputPin>(line: &mut L, on: bool) {
    if let Err(e) = line.set_state(PinState::from(on)) {
        warn!("indicator: line write failed: {:?}", e);
    }
}

/// The four indicators, addressed 0..=3.
pub struct IndicatorBank<L: OutputPin> {
    indicators: [Indicator<L>; INDICATOR_COUNT],
}

impl<L: OutputPin> IndicatorBank<L> {
    /// `lines[i]` is `[red, green, blue]` for indicator `i`.
    pub fn new(lines: [[L; 3]; INDICATOR_COUNT], swap_green_blue: bool) -> Self {
        Self {
            indicators: lines.map(|[r, g, b]| Indicator::new(r, g, b, swap_green_blue)),
        }
    }

    /// Out-of-range indices are ignored.
    pub fn apply(&mut self, index: usize, color: LedColor) {
        match self.indicators.get_mut(index) {
            Some(ind) => ind.apply(color),
            None => warn!("indicator: no indicator {}", index),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Indicator<L>> {
        self.indicators.get(index)
    }

    pub fn colors(&self) -> [LedColor; INDICATOR_COUNT] {
        core::array::from_fn(|i| self.indicators[i].color())
    }
}
