//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future uplink adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { node } => {
                info!("START | node={}", node);
            }
            AppEvent::MotionAlert => {
                info!("ALERT | motion");
            }
            AppEvent::FlameAlert => {
                warn!("ALERT | flame");
            }
            AppEvent::PhotoUploaded { response } => {
                info!("PHOTO | response='{}'", response);
            }
            AppEvent::CommandHandled { text } => {
                info!("CMD   | {}", text);
            }
            AppEvent::UnauthorizedAccess { chat_id } => {
                warn!("AUTH  | rejected chat_id={}", chat_id);
            }
        }
    }
}
