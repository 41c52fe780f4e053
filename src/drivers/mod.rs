//! Peripheral drivers, hardware initialisation, and board helpers.

pub mod buzzer;
pub mod hw_init;
pub mod status_led;
