//! Fire-and-forget buzzer tone driver.
//!
//! `tone()` starts the LEDC square wave and records an off-deadline;
//! the main loop calls `service()` once per iteration to silence the
//! channel when the deadline passes. The caller is never blocked — the
//! hub's alert path adds its own explicit hold delay on top.

use crate::drivers::hw_init;

pub struct Buzzer {
    off_at_ms: Option<u64>,
}

impl Buzzer {
    pub fn new() -> Self {
        Self { off_at_ms: None }
    }

    /// Start a tone at `freq_hz`, to end `duration_ms` from `now_ms`.
    /// A new tone replaces any tone still sounding.
    pub fn tone(&mut self, now_ms: u64, freq_hz: u32, duration_ms: u32) {
        hw_init::buzzer_start(freq_hz);
        self.off_at_ms = Some(now_ms + u64::from(duration_ms));
    }

    /// Silence the channel once the active tone's deadline has passed.
    /// Call from the main loop every iteration.
    pub fn service(&mut self, now_ms: u64) {
        if let Some(deadline) = self.off_at_ms {
            if now_ms >= deadline {
                hw_init::buzzer_stop();
                self.off_at_ms = None;
            }
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.off_at_ms.is_some()
    }
}

impl Default for Buzzer {
    fn default() -> Self {
        Self::new()
    }
}
