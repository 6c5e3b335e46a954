//! FanLed firmware library.
//!
//! Exposes the protocol, domain and driver modules for integration testing
//! and the host simulator.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod protocol;

pub mod adapters;
pub mod drivers;
