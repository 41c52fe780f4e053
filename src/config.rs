//! Device configuration.
//!
//! Identity and tuning parameters for a HomeGuard node. Values are loaded
//! from NVS at boot (see `adapters::nvs`); the defaults carry placeholder
//! credentials so a factory-fresh device boots far enough to be provisioned.
//! Nothing here is persisted implicitly — toggles like motion detection are
//! process-lifetime state and reset on every boot.

use serde::{Deserialize, Serialize};

/// Node configuration: network credentials, bot identity, loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Network ---
    /// WiFi station SSID.
    pub wifi_ssid: heapless::String<32>,
    /// WiFi station password (empty for an open network).
    pub wifi_password: heapless::String<64>,
    /// Seconds to wait for the WiFi join before restarting the device.
    pub wifi_timeout_secs: u32,

    // --- Bot identity ---
    /// Telegram bot token ("<id>:<secret>").
    pub bot_token: heapless::String<64>,
    /// The single chat id authorised to command this node.
    pub authorized_chat_id: heapless::String<24>,

    // --- Timing ---
    /// Mean time between update polls (milliseconds, measured from the
    /// completion of the previous poll).
    pub poll_interval_ms: u64,
    /// How long the photo uploader waits for an HTTP response body.
    pub upload_response_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
            wifi_timeout_secs: 10,

            bot_token: heapless::String::new(),
            authorized_chat_id: heapless::String::new(),

            poll_interval_ms: 1000,
            upload_response_timeout_ms: 10_000,
        }
    }
}

impl DeviceConfig {
    /// Whether the node has enough identity to reach the bot API.
    /// A factory-fresh device (empty token) can still run its sensors,
    /// but every bot interaction will no-op with a warning.
    pub fn is_provisioned(&self) -> bool {
        !self.wifi_ssid.is_empty() && !self.bot_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = DeviceConfig::default();
        assert_eq!(c.poll_interval_ms, 1000);
        assert_eq!(c.wifi_timeout_secs, 10);
        assert_eq!(c.upload_response_timeout_ms, 10_000);
        assert!(!c.is_provisioned());
    }

    #[test]
    fn serde_roundtrip() {
        let mut c = DeviceConfig::default();
        c.wifi_ssid.push_str("HomeNet").unwrap();
        c.bot_token.push_str("12345:token").unwrap();
        c.authorized_chat_id.push_str("987654321").unwrap();

        let json = serde_json::to_string(&c).unwrap();
        let c2: DeviceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.wifi_ssid, c2.wifi_ssid);
        assert_eq!(c.bot_token, c2.bot_token);
        assert_eq!(c.poll_interval_ms, c2.poll_interval_ms);
        assert!(c2.is_provisioned());
    }

    #[test]
    fn postcard_roundtrip() {
        let mut c = DeviceConfig::default();
        c.authorized_chat_id.push_str("42").unwrap();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: DeviceConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.authorized_chat_id, c2.authorized_chat_id);
        assert_eq!(c.upload_response_timeout_ms, c2.upload_response_timeout_ms);
    }
}
