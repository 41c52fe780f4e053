//! ESP32 time and system-control adapters.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic)
//!   and `esp_restart()` for the fail-fast paths.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing; restart requests are recorded, not performed.

use crate::app::ports::{Clock, SystemPort};

/// Monotonic clock for the node loop.
pub struct Esp32Clock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32Clock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for Esp32Clock {
    #[cfg(target_os = "espidf")]
    fn now_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn delay_ms(&self, ms: u32) {
        // esp-idf ships std: a thread sleep yields to FreeRTOS correctly.
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

/// Device restart control.
pub struct Esp32System {
    #[cfg(not(target_os = "espidf"))]
    restart_requested: bool,
}

impl Default for Esp32System {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32System {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            restart_requested: false,
        }
    }

    /// Whether a restart was requested (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }
}

impl SystemPort for Esp32System {
    #[cfg(target_os = "espidf")]
    fn restart(&mut self) {
        log::warn!("device restart");
        unsafe { esp_idf_svc::sys::esp_restart() }
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&mut self) {
        log::warn!("device restart requested (simulation)");
        self.restart_requested = true;
    }
}
