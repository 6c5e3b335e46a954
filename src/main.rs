//! FanLed Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single-threaded serial loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SerialTransport        HardwareAdapter        LogEventSink    │
//! │  (UART / stdio)         (ActuatorPort)         (EventSink)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           CommandService (pure logic)                  │    │
//! │  │  parse · validate · apply · reply                      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  LineReader (framing) · Watchdog                               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use fanled::adapters::hardware::HardwareAdapter;
use fanled::adapters::log_sink::LogEventSink;
use fanled::adapters::serial::SerialTransport;
use fanled::app::service::CommandService;
use fanled::config::FirmwareConfig;
use fanled::drivers::aux_fans::AuxFans;
use fanled::drivers::hw_init::{self, GpioLine, LedcChannel, PrimaryTimer};
use fanled::drivers::indicator::IndicatorBank;
use fanled::drivers::primary_fan::PrimaryFan;
use fanled::drivers::watchdog::Watchdog;
use fanled::protocol::line_reader::{LineReader, ReadOutcome};
use fanled::protocol::reply::Reply;

type BoardAdapter = HardwareAdapter<PrimaryTimer, LedcChannel, GpioLine>;

// ── Boot helpers ──────────────────────────────────────────────

fn init_logger() -> Result<()> {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    {
        // Protocol replies own stdout; logs go to stderr.
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }
    Ok(())
}

/// Compiled-in defaults, optionally overridden on the host by the JSON
/// file named in `FANLED_CONFIG`.
fn load_config() -> Result<FirmwareConfig> {
    #[cfg(not(target_os = "espidf"))]
    {
        if let Ok(path) = std::env::var("FANLED_CONFIG") {
            let json = std::fs::read_to_string(&path)?;
            let config = FirmwareConfig::from_json(&json)?;
            info!("Config loaded from {}", path);
            return Ok(config);
        }
    }

    let config = FirmwareConfig::default();
    config.validate()?;
    info!("Config: compiled-in defaults");
    Ok(config)
}

/// Bring up every output and hand back the adapter that owns them.
fn init_hardware(config: &FirmwareConfig) -> fanled::error::Result<BoardAdapter> {
    let timing = config.carrier_timing()?;
    let p = hw_init::init_peripherals(&timing)?;
    hw_init::init_protocol_uart(config.baud_rate)?;

    Ok(HardwareAdapter::new(
        PrimaryFan::configure(p.primary_timer, timing),
        AuxFans::new(p.aux_channels),
        IndicatorBank::new(p.indicator_lines, config.swap_green_blue),
    ))
}

fn send(reply: Reply, serial: &mut SerialTransport) {
    if let Err(e) = reply.send(serial) {
        warn!("serial: reply {:?} not sent ({})", reply, e);
    }
}

fn idle(ms: u32) {
    #[cfg(target_os = "espidf")]
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    #[cfg(not(target_os = "espidf"))]
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}

/// Middle row of the boot banner, padded to the 38-column frame.
fn banner_title(version: &str) -> String {
    format!("║  FanLed v{:<28}║", version)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logger()?;

    info!("╔══════════════════════════════════════╗");
    info!("{}", banner_title(env!("CARGO_PKG_VERSION")));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config().inspect_err(|e| error!("Config rejected: {:#}", e))?;

    // ── 3. Hardware (outputs held off until start) ────────────
    let mut hw = init_hardware(&config).inspect_err(|e| error!("HAL init failed: {}", e))?;
    let mut watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. Protocol ───────────────────────────────────────────
    let mut serial = SerialTransport::new();
    let mut reader: LineReader = LineReader::new();
    let mut sink = LogEventSink::new();
    let mut service = CommandService::new();

    let ready = service.start(&mut hw, &mut sink);
    send(ready, &mut serial);

    info!("System ready. Entering serial loop.");

    // ── 5. Serial loop ────────────────────────────────────────
    loop {
        match reader.poll(&mut serial) {
            Ok(Some(ReadOutcome::Line(line))) => {
                if let Some(reply) = service.handle_bytes(line, &mut hw, &mut sink) {
                    send(reply, &mut serial);
                }
            }
            Ok(Some(ReadOutcome::Overflow)) => {
                let reply = service.handle_overflow(&mut sink);
                send(reply, &mut serial);
            }
            Ok(None) => {
                if serial.is_closed() {
                    break;
                }
                idle(config.idle_poll_ms);
            }
            Err(e) => {
                warn!("serial: read failed ({}), dropping partial line", e);
                reader.reset();
                idle(config.idle_poll_ms);
            }
        }

        watchdog.feed();
    }

    info!("Serial input closed after {} lines, exiting", service.lines_handled());
    Ok(())
}
