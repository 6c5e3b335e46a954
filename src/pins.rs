//! GPIO / peripheral pin assignments for the FanLed board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Primary fan (25 kHz carrier through an open-drain stage)
// ---------------------------------------------------------------------------

/// MCPWM generator output driving the primary fan's open-drain transistor.
pub const PRIMARY_FAN_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Auxiliary fans (LEDC, 8-bit, non-inverted)
// ---------------------------------------------------------------------------

/// Auxiliary fan outputs, channel 0..3.
pub const AUX_FAN_GPIOS: [i32; 4] = [5, 6, 7, 15];

// ---------------------------------------------------------------------------
// RGB indicators (shared return, logic-high lights a line)
// ---------------------------------------------------------------------------

/// `[red, green, blue]` lines per indicator 0..3.
pub const INDICATOR_GPIOS: [[i32; 3]; 4] = [
    [16, 17, 18],
    [8, 9, 10],
    [11, 12, 13],
    [14, 21, 47],
];

// ---------------------------------------------------------------------------
// Protocol UART (the console UART stays reserved for logs)
// ---------------------------------------------------------------------------

pub const PROTOCOL_UART_PORT: i32 = 1;
pub const PROTOCOL_UART_TX_GPIO: i32 = 1;
pub const PROTOCOL_UART_RX_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const AUX_PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the auxiliary fans.
pub const AUX_PWM_FREQ_HZ: u32 = 25_000;
