//! GPIO / peripheral pin assignments for both HomeGuard boards.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Camera node (AI-Thinker ESP32-CAM)
// ---------------------------------------------------------------------------

pub mod camera_node {
    /// On-board high-power flash LED (active HIGH).
    pub const FLASH_LED_GPIO: i32 = 4;
    /// PIR motion sensor — digital output, rising edge on detection.
    pub const MOTION_SENSOR_GPIO: i32 = 2;
    /// Red alert indicator LED.
    pub const RED_LED_GPIO: i32 = 13;
    /// Piezo buzzer, driven by an LEDC PWM channel.
    pub const BUZZER_GPIO: i32 = 15;

    // OV2640 sensor wiring (AI-Thinker module).
    pub const CAM_PWDN_GPIO: i32 = 32;
    pub const CAM_RESET_GPIO: i32 = -1;
    pub const CAM_XCLK_GPIO: i32 = 0;
    pub const CAM_SIOD_GPIO: i32 = 26;
    pub const CAM_SIOC_GPIO: i32 = 27;
    pub const CAM_Y9_GPIO: i32 = 35;
    pub const CAM_Y8_GPIO: i32 = 34;
    pub const CAM_Y7_GPIO: i32 = 39;
    pub const CAM_Y6_GPIO: i32 = 36;
    pub const CAM_Y5_GPIO: i32 = 21;
    pub const CAM_Y4_GPIO: i32 = 19;
    pub const CAM_Y3_GPIO: i32 = 18;
    pub const CAM_Y2_GPIO: i32 = 5;
    pub const CAM_VSYNC_GPIO: i32 = 25;
    pub const CAM_HREF_GPIO: i32 = 23;
    pub const CAM_PCLK_GPIO: i32 = 22;
}

// ---------------------------------------------------------------------------
// Sensor hub
// ---------------------------------------------------------------------------

pub mod sensor_hub {
    /// MQ-series gas sensor — analog voltage on ADC1.
    /// GPIO 35 is ADC1 channel 7 on the ESP32.
    pub const GAS_SENSOR_GPIO: i32 = 35;
    pub const GAS_ADC_CHANNEL: u32 = 7;
    /// IR flame sensor — digital, active LOW (falling edge on detection).
    pub const FLAME_SENSOR_GPIO: i32 = 18;
    /// Red alert indicator LED.
    pub const RED_LED_GPIO: i32 = 33;
    /// Piezo buzzer, driven by an LEDC PWM channel.
    pub const BUZZER_GPIO: i32 = 32;
}
