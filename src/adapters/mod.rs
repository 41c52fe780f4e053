//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements        | Connects to                   |
//! |-------------|-------------------|-------------------------------|
//! | `camera`    | CapturePort       | esp32-camera frame pipeline   |
//! | `hardware`  | SignalPort        | ESP32 GPIO, LEDC buzzer       |
//! |             | ProbePort         | ESP32 ADC, GPIO               |
//! | `log_sink`  | EventSink         | Serial log output             |
//! | `nvs`       | ConfigPort        | NVS / in-memory store         |
//! | `time`      | Clock, SystemPort | ESP32 system timer / restart  |
//! | `tls`       | SecuredStream     | TCP + TLS (mbedtls bundle)    |
//! | `wifi`      | —                 | ESP-IDF WiFi STA              |

pub mod camera;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod tls;
pub mod wifi;
