//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for both HomeGuard nodes:
//! command authorization and dispatch, the poll cadence, trigger-flag
//! handling, and the per-node tick sequences. All interaction with
//! hardware and the network happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod camera;
pub mod commands;
pub mod events;
pub mod hub;
pub mod poller;
pub mod ports;
