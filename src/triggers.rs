//! Interrupt-driven trigger flags.
//!
//! Each hardware trigger (motion rising edge, flame falling edge) owns one
//! boolean flag. The ISR's only job is a single atomic store; everything
//! else happens in the main loop's next iteration.
//!
//! ```text
//! ┌─────────────┐   raise()   ┌──────────────┐  is_raised()  ┌────────────┐
//! │ GPIO ISR    │────────────▶│ TriggerFlag  │──────────────▶│ Main Loop  │
//! │ (producer)  │             │ (AtomicBool) │◀──────────────│ (consumer) │
//! └─────────────┘             └──────────────┘    clear()    └────────────┘
//! ```
//!
//! Semantics are coalescing: at most one outstanding detection
//! is tracked per sensor. A second edge before the first is serviced is
//! absorbed into the same pending flag. The main loop is also the only
//! clearer — a raised flag stays pending across iterations until the loop
//! decides the detection has been handled (for the camera node that means
//! "motion detection is enabled", so a detection that arrives while the
//! feature is toggled off stays latched until re-enable).

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-producer (ISR) / single-consumer (main loop) boolean flag.
pub struct TriggerFlag(AtomicBool);

impl TriggerFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark the trigger as pending.
    /// Safe to call from ISR context (lock-free atomic store).
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a detection is pending. Does not consume the flag.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the pending detection. Main-loop only.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for TriggerFlag {
    fn default() -> Self {
        Self::new()
    }
}

// ── Static flags, one per sensor ──────────────────────────────
//
// Kept in statics so the `extern "C"` ISR trampolines in
// `drivers::hw_init` can reach them without a context pointer.

/// PIR motion trigger (camera node).
pub static MOTION_TRIGGER: TriggerFlag = TriggerFlag::new();

/// IR flame trigger (sensor hub).
pub static FLAME_TRIGGER: TriggerFlag = TriggerFlag::new();

/// ISR handler — register on the motion sensor's rising edge.
pub fn motion_isr_handler() {
    MOTION_TRIGGER.raise();
}

/// ISR handler — register on the flame sensor's falling edge.
pub fn flame_isr_handler() {
    FLAME_TRIGGER.raise();
}
