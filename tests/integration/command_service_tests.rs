//! Integration tests for the line → CommandService → actuator pipeline.
//!
//! These run on the host and check the reply text, the committed state and
//! the exact actuator calls for each kind of line, using mock adapters.

use crate::mock_hw::{ActuatorCall, LogSink, MockHardware};

use fanled::app::events::AppEvent;
use fanled::app::service::CommandService;
use fanled::app::state::{DeviceState, LedColor};
use fanled::error::ProtocolError;

fn started() -> (CommandService, MockHardware, LogSink) {
    let mut svc = CommandService::new();
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    let ready = svc.start(&mut hw, &mut sink);
    assert_eq!(ready.to_string(), "READY");
    hw.clear();
    sink.events.clear();
    (svc, hw, sink)
}

fn reply(svc: &mut CommandService, hw: &mut MockHardware, sink: &mut LogSink, line: &str) -> String {
    svc.handle_line(line, hw, sink)
        .map(|r| r.to_string())
        .unwrap_or_default()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_drives_power_on_state_to_every_output() {
    let mut svc = CommandService::new();
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    svc.start(&mut hw, &mut sink);

    assert_eq!(hw.fan_outputs(), [Some(0); 5]);
    assert_eq!(hw.indicator_outputs(), [Some(LedColor::Off); 4]);
    assert_eq!(sink.events, vec![AppEvent::Started(DeviceState::power_on())]);
}

#[test]
fn get_after_boot_reports_power_on_state() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "GET?"),
        "DATA:STATE:F:0,0,0,0,0;L:OFF,OFF,OFF,OFF"
    );
    assert!(hw.calls.is_empty(), "a query must not touch outputs");
}

// ── Setters ───────────────────────────────────────────────────

#[test]
fn setf_then_get() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETF 20 20 20 20 30"),
        "ACK:SETF:20,20,20,20,30"
    );
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "GET?"),
        "DATA:STATE:F:20,20,20,20,30;L:OFF,OFF,OFF,OFF"
    );
    assert_eq!(hw.fan_outputs(), [Some(20), Some(20), Some(20), Some(20), Some(30)]);
}

#[test]
fn setf_writes_aux_channels_then_primary() {
    let (mut svc, mut hw, mut sink) = started();
    reply(&mut svc, &mut hw, &mut sink, "SETF 1 2 3 4 5");
    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::AuxFan { channel: 0, percent: 1 },
            ActuatorCall::AuxFan { channel: 1, percent: 2 },
            ActuatorCall::AuxFan { channel: 2, percent: 3 },
            ActuatorCall::AuxFan { channel: 3, percent: 4 },
            ActuatorCall::PrimaryFan { percent: 5 },
        ]
    );
}

#[test]
fn setl_lowercase_and_mixed_case() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETL r g B off"),
        "ACK:SETL:R,G,B,OFF"
    );
    assert_eq!(
        hw.indicator_outputs(),
        [
            Some(LedColor::Red),
            Some(LedColor::Green),
            Some(LedColor::Blue),
            Some(LedColor::Off)
        ]
    );
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETL w Off oFf W"),
        "ACK:SETL:W,OFF,OFF,W"
    );
}

#[test]
fn setall_applies_both_banks() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETALL 10 20 30 40 50 W OFF R G"),
        "ACK:SETALL:10,20,30,40,50;W,OFF,R,G"
    );
    assert_eq!(
        svc.state().fans.as_array(),
        [10, 20, 30, 40, 50]
    );
    assert_eq!(
        svc.state().leds,
        [LedColor::White, LedColor::Off, LedColor::Red, LedColor::Green]
    );
    assert_eq!(hw.calls.len(), 9);
}

#[test]
fn extra_whitespace_between_tokens() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "  SETF\t0   100 0 100\t 0  "),
        "ACK:SETF:0,100,0,100,0"
    );
}

#[test]
fn repeated_command_is_idempotent() {
    let (mut svc, mut hw, mut sink) = started();
    let first = reply(&mut svc, &mut hw, &mut sink, "SETALL 5 5 5 5 5 R R R R");
    let state = *svc.state();
    let second = reply(&mut svc, &mut hw, &mut sink, "SETALL 5 5 5 5 5 R R R R");
    assert_eq!(first, second);
    assert_eq!(*svc.state(), state);
}

// ── Rejections ────────────────────────────────────────────────

#[test]
fn out_of_range_leaves_state_unchanged() {
    let (mut svc, mut hw, mut sink) = started();
    reply(&mut svc, &mut hw, &mut sink, "SETF 20 20 20 20 30");
    hw.clear();

    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETF 150 0 0 0 0"),
        "ERR:OUT_OF_RANGE"
    );
    assert!(hw.calls.is_empty());
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "GET?"),
        "DATA:STATE:F:20,20,20,20,30;L:OFF,OFF,OFF,OFF"
    );
}

#[test]
fn negative_duty_is_out_of_range() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETF -1 0 0 0 0"),
        "ERR:OUT_OF_RANGE"
    );
}

#[test]
fn setall_is_all_or_nothing() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETALL 10 10 10 10 10 R G B X"),
        "ERR:BAD_COLOR"
    );
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETALL 10 10 10 10 101 R G B W"),
        "ERR:OUT_OF_RANGE"
    );
    assert!(hw.calls.is_empty());
    assert_eq!(*svc.state(), DeviceState::power_on());
}

#[test]
fn checks_run_count_then_range_then_colour() {
    let (mut svc, mut hw, mut sink) = started();
    // Wrong count wins over a bad value.
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETALL 200 0 0 0 0 X X X"),
        "ERR:BAD_ARGS"
    );
    // Range wins over colour.
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETALL 200 0 0 0 0 X X X X"),
        "ERR:OUT_OF_RANGE"
    );
}

#[test]
fn argument_count_and_format_errors() {
    let (mut svc, mut hw, mut sink) = started();
    for line in [
        "SETF 1 2 3 4",
        "SETF 1 2 3 4 5 6",
        "SETF a 2 3 4 5",
        "SETF 1.5 2 3 4 5",
        "SETL R G B",
        "SETL R G B W OFF",
        "SETALL",
    ] {
        assert_eq!(reply(&mut svc, &mut hw, &mut sink, line), "ERR:BAD_ARGS", "{line}");
    }
    assert!(hw.calls.is_empty());
}

#[test]
fn get_state_ignores_trailing_tokens() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "GET? now please"),
        "DATA:STATE:F:0,0,0,0,0;L:OFF,OFF,OFF,OFF"
    );
}

#[test]
fn unknown_colour_rejected() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(
        reply(&mut svc, &mut hw, &mut sink, "SETL R G B PURPLE"),
        "ERR:BAD_COLOR"
    );
}

#[test]
fn unknown_keyword_and_case_sensitive_keywords() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(reply(&mut svc, &mut hw, &mut sink, "PING"), "ERR:UNKNOWN_CMD");
    assert_eq!(reply(&mut svc, &mut hw, &mut sink, "setf 1 2 3 4 5"), "ERR:UNKNOWN_CMD");
    assert_eq!(reply(&mut svc, &mut hw, &mut sink, "get?"), "ERR:UNKNOWN_CMD");
    assert_eq!(
        sink.events,
        vec![AppEvent::Rejected(ProtocolError::UnknownCmd); 3]
    );
}

#[test]
fn blank_line_gets_no_reply() {
    let (mut svc, mut hw, mut sink) = started();
    assert_eq!(svc.handle_line("", &mut hw, &mut sink), None);
    assert_eq!(svc.handle_line("   ", &mut hw, &mut sink), None);
    assert!(sink.events.is_empty());
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn setall_emits_fans_then_leds() {
    let (mut svc, mut hw, mut sink) = started();
    reply(&mut svc, &mut hw, &mut sink, "SETALL 1 1 1 1 1 W W W W");
    let rendered = sink.rendered();
    assert_eq!(rendered.len(), 2);
    assert!(rendered[0].starts_with("FansApplied"));
    assert!(rendered[1].starts_with("LedsApplied"));
}
