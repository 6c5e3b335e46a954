//! Fuzz target: `CommandService::handle_bytes`
//!
//! Feeds arbitrary line contents to the interpreter and asserts that a
//! rejected line never touches an output, and that an accepted one leaves
//! the state matching what `GET?` reports.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use fanled::app::events::AppEvent;
use fanled::app::ports::{ActuatorPort, EventSink};
use fanled::app::service::CommandService;
use fanled::app::state::LedColor;
use fanled::protocol::reply::Reply;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Writes(usize);

impl ActuatorPort for Writes {
    fn set_aux_fan(&mut self, _channel: usize, percent: u8) {
        assert!(percent <= 100);
        self.0 += 1;
    }
    fn set_primary_fan(&mut self, percent: u8) {
        assert!(percent <= 100);
        self.0 += 1;
    }
    fn set_indicator(&mut self, _indicator: usize, _color: LedColor) {
        self.0 += 1;
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut svc = CommandService::new();
    let mut hw = Writes::default();
    let before = *svc.state();

    match svc.handle_bytes(data, &mut hw, &mut Discard) {
        Some(Reply::Error(_)) | None => {
            assert_eq!(hw.0, 0, "rejected line reached hardware");
            assert_eq!(*svc.state(), before);
        }
        Some(_) => {
            let state = *svc.state();
            let readback = svc.handle_line("GET?", &mut hw, &mut Discard);
            assert_eq!(readback, Some(Reply::State(state)));
        }
    }
});
