//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full output
//! history without touching real PWM/GPIO registers.

use fanled::app::events::AppEvent;
use fanled::app::ports::{ActuatorPort, EventSink};
use fanled::app::state::LedColor;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    AuxFan { channel: usize, percent: u8 },
    PrimaryFan { percent: u8 },
    Indicator { indicator: usize, color: LedColor },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Last percent written to each fan, primary last.  Unwritten fans
    /// read as `None`.
    pub fn fan_outputs(&self) -> [Option<u8>; 5] {
        let mut out = [None; 5];
        for call in &self.calls {
            match *call {
                ActuatorCall::AuxFan { channel, percent } => out[channel] = Some(percent),
                ActuatorCall::PrimaryFan { percent } => out[4] = Some(percent),
                ActuatorCall::Indicator { .. } => {}
            }
        }
        out
    }

    /// Last colour written to each indicator.
    pub fn indicator_outputs(&self) -> [Option<LedColor>; 4] {
        let mut out = [None; 4];
        for call in &self.calls {
            if let ActuatorCall::Indicator { indicator, color } = *call {
                out[indicator] = Some(color);
            }
        }
        out
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_aux_fan(&mut self, channel: usize, percent: u8) {
        self.calls.push(ActuatorCall::AuxFan { channel, percent });
    }

    fn set_primary_fan(&mut self, percent: u8) {
        self.calls.push(ActuatorCall::PrimaryFan { percent });
    }

    fn set_indicator(&mut self, indicator: usize, color: LedColor) {
        self.calls.push(ActuatorCall::Indicator { indicator, color });
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn rendered(&self) -> Vec<String> {
        self.events.iter().map(|e| format!("{:?}", e)).collect()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
