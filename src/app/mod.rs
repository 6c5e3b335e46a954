//! Application core — pure protocol logic, zero I/O.
//!
//! Parsing, validation and the Device State live here.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
