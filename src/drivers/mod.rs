//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod aux_fans;
pub mod hw_init;
pub mod indicator;
pub mod primary_fan;
pub mod watchdog;
