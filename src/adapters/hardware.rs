//! Board adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the LED and buzzer drivers and the sensor pin bindings, exposing
//! them through [`SignalPort`] and [`ProbePort`]. This is the only
//! module besides `drivers` that touches pin-level state. On non-espidf
//! targets, the underlying drivers use the `hw_init` simulation state.

use crate::adapters::time::Esp32Clock;
use crate::app::ports::{Clock, ProbePort, SignalPort};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::status_led::Led;
use crate::pins;

/// Concrete adapter that combines a board's I/O behind port traits.
pub struct BoardAdapter {
    /// Flash LED is camera-node-only; the hub has no flash wiring.
    flash: Option<Led>,
    indicator: Led,
    buzzer: Buzzer,
    gas_adc_channel: u32,
    flame_gpio: i32,
    clock: Esp32Clock,
}

impl BoardAdapter {
    /// Camera node wiring: flash + indicator + buzzer, no probe sensors.
    pub fn for_camera_node() -> Self {
        use pins::camera_node as p;
        Self {
            flash: Some(Led::new(p::FLASH_LED_GPIO)),
            indicator: Led::new(p::RED_LED_GPIO),
            buzzer: Buzzer::new(),
            gas_adc_channel: 0,
            flame_gpio: -1,
            clock: Esp32Clock::new(),
        }
    }

    /// Sensor hub wiring: indicator + buzzer + gas ADC + flame input.
    pub fn for_sensor_hub() -> Self {
        use pins::sensor_hub as p;
        Self {
            flash: None,
            indicator: Led::new(p::RED_LED_GPIO),
            buzzer: Buzzer::new(),
            gas_adc_channel: p::GAS_ADC_CHANNEL,
            flame_gpio: p::FLAME_SENSOR_GPIO,
            clock: Esp32Clock::new(),
        }
    }

    /// Per-iteration housekeeping: silences the buzzer once the active
    /// tone's deadline has passed. Call from the node loop.
    pub fn service(&mut self) {
        self.buzzer.service(self.clock.now_ms());
    }

    pub fn flash_is_on(&self) -> bool {
        self.flash.as_ref().is_some_and(Led::is_on)
    }

    pub fn indicator_is_on(&self) -> bool {
        self.indicator.is_on()
    }
}

// ── SignalPort implementation ─────────────────────────────────

impl SignalPort for BoardAdapter {
    fn set_flash(&mut self, on: bool) {
        if let Some(flash) = self.flash.as_mut() {
            flash.set(on);
        }
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator.set(on);
    }

    fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.buzzer.tone(self.clock.now_ms(), freq_hz, duration_ms);
    }
}

// ── ProbePort implementation ──────────────────────────────────

impl ProbePort for BoardAdapter {
    fn read_gas_raw(&mut self) -> u16 {
        crate::drivers::hw_init::adc1_read(self.gas_adc_channel)
    }

    fn flame_pin_high(&mut self) -> bool {
        crate::drivers::hw_init::gpio_read(self.flame_gpio)
    }
}
