//! Outbound application events.
//!
//! The [`CommandService`](super::service::CommandService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  They are a
//! side channel for diagnostics; the protocol reply itself goes back over
//! the serial transport.

use crate::error::ProtocolError;

use super::state::{DeviceState, FanBank, LedBank};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Outputs driven to the power-on state; commands accepted from now on.
    Started(DeviceState),

    /// A fan duty set was applied and committed.
    FansApplied(FanBank),

    /// An indicator colour set was applied and committed.
    LedsApplied(LedBank),

    /// The host read back the device state.
    StateQueried(DeviceState),

    /// A line was rejected; nothing changed.
    Rejected(ProtocolError),

    /// A line exceeded the reader's capacity and was dropped.
    LineOverflow,
}
