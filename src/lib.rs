//! HomeGuard firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.
//!
//! Two firmware images are built from this crate: the camera node
//! (motion detection + photo upload) and the sensor hub (flame/gas
//! alerting). Both talk to the same Telegram bot.

#![deny(unused_must_use)]

pub mod app;
pub mod bot;
pub mod config;
pub mod triggers;

mod error;
mod pins;

pub use error::{BotError, CaptureError, ConnectError, Error, Result};

// Re-export the ESPidf-only modules so the crate compiles; the actual
// implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
