//! Single-pin LED driver, used for both the flash LED and the red
//! alert indicator. Tracks the commanded state in memory so adapters
//! can answer queries without a GPIO read-back.

use crate::drivers::hw_init;

pub struct Led {
    gpio: i32,
    on: bool,
}

impl Led {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}
