//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the logger
//! (ESP-IDF console UART on the board, stderr on the host).  The protocol
//! UART never carries log output.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::app::state::LedList;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | F:{} L:{}", state.fans, LedList(&state.leds));
            }
            AppEvent::FansApplied(fans) => {
                info!("FANS  | {}", fans);
            }
            AppEvent::LedsApplied(leds) => {
                info!("LEDS  | {}", LedList(leds));
            }
            AppEvent::StateQueried(state) => {
                debug!("QUERY | F:{} L:{}", state.fans, LedList(&state.leds));
            }
            AppEvent::Rejected(err) => {
                warn!("REJECT| {}", err.code());
            }
            AppEvent::LineOverflow => {
                warn!("REJECT| line too long");
            }
        }
    }
}
