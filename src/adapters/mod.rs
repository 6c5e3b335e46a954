//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                          |
//! |------------|--------------|--------------------------------------|
//! | `hardware` | ActuatorPort | MCPWM, LEDC, GPIO (via drivers)      |
//! | `log_sink` | EventSink    | Console log output                   |
//! | `serial`   | Transport    | Protocol UART / host stdin+stdout    |

pub mod hardware;
pub mod log_sink;
pub mod serial;
