//! Command service — the protocol state machine.
//!
//! [`CommandService`] owns the Device State.  Every complete line goes
//! through [`CommandService::handle_line`], which yields at most one
//! [`Reply`].  All hardware access flows through the [`ActuatorPort`]
//! injected at the call site, making the interpreter testable with mock
//! adapters.
//!
//! ```text
//!   line ──▶ ┌──────────────────────────┐ ──▶ Reply
//!            │      CommandService      │
//! Actuator ◀─│  parse · validate · apply│──▶ EventSink
//!            └──────────────────────────┘
//! ```

use log::{debug, info};

use crate::error::ProtocolError;
use crate::protocol::reply::Reply;

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};
use super::state::{DeviceState, FanBank, LedBank, LedList};

// ───────────────────────────────────────────────────────────────
// CommandService
// ───────────────────────────────────────────────────────────────

/// Interprets protocol lines against the Device State.
pub struct CommandService {
    state: DeviceState,
    lines_handled: u32,
}

impl Default for CommandService {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandService {
    /// Power-on state: all fans 0 %, all indicators off.
    ///
    /// Outputs are not touched until [`start`](Self::start).
    pub fn new() -> Self {
        Self {
            state: DeviceState::power_on(),
            lines_handled: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to the current state and report readiness.
    ///
    /// The returned [`Reply::Ready`] must be sent before any command is
    /// read.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) -> Reply {
        apply_fans(hw, &self.state.fans);
        apply_leds(hw, &self.state.leds);
        sink.emit(&AppEvent::Started(self.state));
        info!(
            "CommandService started (F:{} L:{})",
            self.state.fans,
            LedList(&self.state.leds)
        );
        Reply::Ready
    }

    // ── Line handling ─────────────────────────────────────────

    /// Handle one complete line (without its terminator).
    ///
    /// Blank lines yield `None`.  Everything else yields exactly one reply;
    /// a rejected line leaves state and outputs untouched.
    pub fn handle_line(
        &mut self,
        line: &str,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        self.lines_handled = self.lines_handled.wrapping_add(1);
        debug!("line #{}: {:?}", self.lines_handled, line);

        let reply = match Command::parse(line) {
            Ok(cmd) => self.execute(cmd, hw, sink),
            Err(e) => reject(e, sink),
        };
        Some(reply)
    }

    /// Handle raw line bytes as delivered by the line reader.
    ///
    /// Bytes that are not UTF-8 cannot spell any keyword.
    pub fn handle_bytes(
        &mut self,
        line: &[u8],
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<Reply> {
        match core::str::from_utf8(line) {
            Ok(text) => self.handle_line(text, hw, sink),
            Err(_) => {
                self.lines_handled = self.lines_handled.wrapping_add(1);
                Some(reject(ProtocolError::UnknownCmd, sink))
            }
        }
    }

    /// Answer a line the reader had to drop for length.
    pub fn handle_overflow(&mut self, sink: &mut impl EventSink) -> Reply {
        self.lines_handled = self.lines_handled.wrapping_add(1);
        sink.emit(&AppEvent::LineOverflow);
        Reply::Error(ProtocolError::BadArgs)
    }

    /// Apply an already-validated command.
    ///
    /// Outputs are driven first, then the state is committed, then the
    /// acknowledgement is built.
    pub fn execute(
        &mut self,
        cmd: Command,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Reply {
        match cmd {
            Command::SetFans(fans) => {
                self.commit_fans(fans, hw, sink);
                Reply::SetFans(fans)
            }
            Command::SetLeds(leds) => {
                self.commit_leds(leds, hw, sink);
                Reply::SetLeds(leds)
            }
            Command::SetAll(fans, leds) => {
                self.commit_fans(fans, hw, sink);
                self.commit_leds(leds, hw, sink);
                Reply::SetAll(fans, leds)
            }
            Command::GetState => {
                sink.emit(&AppEvent::StateQueried(self.state));
                Reply::State(self.state)
            }
            Command::Unknown => reject(ProtocolError::UnknownCmd, sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current Device State.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Non-blank lines handled since startup (wraps).
    pub fn lines_handled(&self) -> u32 {
        self.lines_handled
    }

    // ── Internal ──────────────────────────────────────────────

    fn commit_fans(&mut self, fans: FanBank, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        apply_fans(hw, &fans);
        self.state.fans = fans;
        sink.emit(&AppEvent::FansApplied(fans));
    }

    fn commit_leds(&mut self, leds: LedBank, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        apply_leds(hw, &leds);
        self.state.leds = leds;
        sink.emit(&AppEvent::LedsApplied(leds));
    }
}

fn reject(e: ProtocolError, sink: &mut impl EventSink) -> Reply {
    sink.emit(&AppEvent::Rejected(e));
    Reply::Error(e)
}

/// Translate a fan bank into port calls.
fn apply_fans(hw: &mut impl ActuatorPort, fans: &FanBank) {
    for (channel, &duty) in fans.aux().iter().enumerate() {
        hw.set_aux_fan(channel, duty);
    }
    hw.set_primary_fan(fans.primary());
}

fn apply_leds(hw: &mut impl ActuatorPort, leds: &LedBank) {
    for (indicator, &color) in leds.iter().enumerate() {
        hw.set_indicator(indicator, color);
    }
}
