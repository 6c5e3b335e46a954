//! End-to-end serial sessions: raw bytes in, reply lines out.
//!
//! Wires the same pieces as `main()` (line reader, command service,
//! hardware adapter over the simulated peripherals) to an in-memory
//! transport, then checks what the host would read back and what the
//! simulated outputs ended up at.

use crate::mock_hw::LogSink;

use fanled::adapters::hardware::HardwareAdapter;
use fanled::app::service::CommandService;
use fanled::app::state::LedColor;
use fanled::config::FirmwareConfig;
use fanled::drivers::aux_fans::AuxFans;
use fanled::drivers::hw_init::{self, GpioLine, LedcChannel, PrimaryTimer};
use fanled::drivers::indicator::IndicatorBank;
use fanled::drivers::primary_fan::PrimaryFan;
use fanled::protocol::line_reader::{LineReader, ReadOutcome};
use fanled::protocol::transport::MemoryTransport;

struct Session {
    wire: MemoryTransport,
    reader: LineReader,
    service: CommandService,
    hw: HardwareAdapter<PrimaryTimer, LedcChannel, GpioLine>,
    sink: LogSink,
}

impl Session {
    fn boot(config: &FirmwareConfig) -> Self {
        let timing = config.carrier_timing().unwrap();
        let p = hw_init::init_peripherals(&timing).unwrap();
        let mut s = Self {
            wire: MemoryTransport::new(),
            reader: LineReader::new(),
            service: CommandService::new(),
            hw: HardwareAdapter::new(
                PrimaryFan::configure(p.primary_timer, timing),
                AuxFans::new(p.aux_channels),
                IndicatorBank::new(p.indicator_lines, config.swap_green_blue),
            ),
            sink: LogSink::new(),
        };
        let ready = s.service.start(&mut s.hw, &mut s.sink);
        ready.send(&mut s.wire).unwrap();
        s
    }

    /// Feed `bytes` and run the loop until the transport is drained.
    fn feed(&mut self, bytes: &[u8]) {
        self.wire.inject(bytes);
        while let Some(outcome) = self.reader.poll(&mut self.wire).unwrap() {
            let reply = match outcome {
                ReadOutcome::Line(line) => {
                    self.service.handle_bytes(line, &mut self.hw, &mut self.sink)
                }
                ReadOutcome::Overflow => Some(self.service.handle_overflow(&mut self.sink)),
            };
            if let Some(reply) = reply {
                reply.send(&mut self.wire).unwrap();
            }
        }
    }

    fn lines(&self) -> Vec<String> {
        self.wire.output_lines()
    }
}

#[test]
fn ready_is_first_line() {
    let s = Session::boot(&FirmwareConfig::default());
    assert_eq!(s.wire.output(), b"READY\n");
}

#[test]
fn full_session_matches_host_expectations() {
    let mut s = Session::boot(&FirmwareConfig::default());
    s.feed(b"SETF 20 20 20 20 30\nGET?\nSETL r g B off\nSETF 150 0 0 0 0\nPING\n\nGET?\n");
    assert_eq!(
        s.lines(),
        vec![
            "READY",
            "ACK:SETF:20,20,20,20,30",
            "DATA:STATE:F:20,20,20,20,30;L:OFF,OFF,OFF,OFF",
            "ACK:SETL:R,G,B,OFF",
            "ERR:OUT_OF_RANGE",
            "ERR:UNKNOWN_CMD",
            "DATA:STATE:F:20,20,20,20,30;L:R,G,B,OFF",
        ]
    );
}

#[test]
fn crlf_and_split_writes() {
    let mut s = Session::boot(&FirmwareConfig::default());
    s.feed(b"SETA");
    s.feed(b"LL 100 100 100 100 100 W W W W\r");
    assert_eq!(s.lines(), vec!["READY"]);
    s.feed(b"\n");
    assert_eq!(s.lines().last().unwrap(), "ACK:SETALL:100,100,100,100,100;W,W,W,W");
}

#[test]
fn outputs_reach_simulated_peripherals() {
    let mut s = Session::boot(&FirmwareConfig::default());
    s.feed(b"SETALL 0 20 50 100 30 R G B W\n");

    let duties: Vec<u16> = (0..4).map(|ch| s.hw.aux().channel(ch).unwrap().duty()).collect();
    assert_eq!(duties, vec![0, 51, 128, 255]);
    // 30 % on the active-low primary: 3200 * 70 / 100.
    assert_eq!(s.hw.primary().timer().compare(), 2240);
    assert_eq!(
        s.hw.indicators().colors(),
        [LedColor::Red, LedColor::Green, LedColor::Blue, LedColor::White]
    );
    let (r, g, b) = s.hw.indicators().get(2).unwrap().lines();
    assert_eq!((r.is_high(), g.is_high(), b.is_high()), (false, false, true));
}

#[test]
fn swapped_board_lights_the_right_line() {
    let config = FirmwareConfig {
        swap_green_blue: true,
        ..FirmwareConfig::default()
    };
    let mut s = Session::boot(&config);
    s.feed(b"SETL G OFF OFF OFF\n");
    let (_, g, b) = s.hw.indicators().get(0).unwrap().lines();
    assert!(!g.is_high());
    assert!(b.is_high());
    assert_eq!(s.lines().last().unwrap(), "ACK:SETL:G,OFF,OFF,OFF");
}

#[test]
fn avr_clock_gives_same_duty_semantics() {
    let config = FirmwareConfig {
        primary_timer_clock_hz: 16_000_000,
        ..FirmwareConfig::default()
    };
    let mut s = Session::boot(&config);
    assert_eq!(s.hw.primary().timer().period(), 640);
    assert_eq!(s.hw.primary().timer().compare(), 640);
    s.feed(b"SETF 0 0 0 0 100\n");
    assert_eq!(s.hw.primary().timer().compare(), 0);
}

#[test]
fn overlong_line_rejected_and_session_recovers() {
    let mut s = Session::boot(&FirmwareConfig::default());
    let mut long = b"SETF ".to_vec();
    long.extend(std::iter::repeat_n(b'1', 100));
    long.push(b'\n');
    s.feed(&long);
    s.feed(b"GET?\n");
    assert_eq!(
        s.lines(),
        vec![
            "READY",
            "ERR:BAD_ARGS",
            "DATA:STATE:F:0,0,0,0,0;L:OFF,OFF,OFF,OFF",
        ]
    );
}

#[test]
fn overlong_blank_line_gets_no_reply() {
    let mut s = Session::boot(&FirmwareConfig::default());
    let mut blank = vec![b' '; 100];
    blank.extend_from_slice(b"\t\t\r\n");
    s.feed(&blank);
    assert_eq!(s.lines(), vec!["READY"]);
    s.feed(b"GET?\n");
    assert_eq!(
        s.lines(),
        vec!["READY", "DATA:STATE:F:0,0,0,0,0;L:OFF,OFF,OFF,OFF"]
    );
}

#[test]
fn invalid_utf8_line_is_unknown() {
    let mut s = Session::boot(&FirmwareConfig::default());
    s.feed(&[0xC3, 0x28, b'\n']);
    assert_eq!(s.lines().last().unwrap(), "ERR:UNKNOWN_CMD");
}

#[test]
fn rejected_line_keeps_hardware_untouched() {
    let mut s = Session::boot(&FirmwareConfig::default());
    s.feed(b"SETALL 10 10 10 10 10 W R OFF G\n");
    let before = s.hw.primary().compare();
    s.feed(b"SETALL 90 90 90 90 90 R G B NOPE\n");
    assert_eq!(s.lines().last().unwrap(), "ERR:BAD_COLOR");
    assert_eq!(s.hw.primary().compare(), before);
    assert_eq!(s.hw.aux().hw_duty(), [26; 4]);
    assert_eq!(
        s.hw.indicators().colors(),
        [LedColor::White, LedColor::Red, LedColor::Off, LedColor::Green]
    );
}
