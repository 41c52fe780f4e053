//! HomeGuard sensor hub — main entry point.
//!
//! Structurally the camera node's sibling: same bootstrap, same loop
//! shape, no capture pipeline. The flame ISR raises a trigger flag;
//! the loop's alert path sounds the buzzer and messages the bot.

use anyhow::Result;
use log::{error, info, warn};

use homeguard::adapters::hardware::BoardAdapter;
use homeguard::adapters::log_sink::LogEventSink;
use homeguard::adapters::nvs::NvsAdapter;
use homeguard::adapters::time::{Esp32Clock, Esp32System};
use homeguard::adapters::tls::TlsStream;
use homeguard::adapters::wifi::WifiStation;
use homeguard::app::hub::HubService;
use homeguard::app::ports::{Clock, ConfigPort, SystemPort};
use homeguard::bot::client::TelegramClient;
use homeguard::config::DeviceConfig;
use homeguard::drivers::hw_init;
use homeguard::triggers::FLAME_TRIGGER;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("HomeGuard sensor hub v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_hub_board() {
        // Peripheral init failure is critical — log and halt.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Config from NVS (or defaults) ──────────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            DeviceConfig::default()
        }
    };
    if !config.is_provisioned() {
        warn!("device not provisioned — bot API calls will fail until NVS config is written");
    }

    let clock = Esp32Clock::new();
    let mut system = Esp32System::new();

    // ── 4. WiFi join (fail-fast) ──────────────────────────────
    let mut wifi = WifiStation::new(config.wifi_timeout_secs);
    if let Err(e) =
        wifi.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str())
    {
        warn!("WiFi credentials rejected: {}", e);
    }
    if let Err(e) = wifi.connect_blocking(&clock) {
        error!("WiFi join failed ({}) — restarting", e);
        system.restart();
    }

    // ── 5. Adapters + service ─────────────────────────────────
    let mut hw = BoardAdapter::for_sensor_hub();
    let mut sink = LogEventSink::new();
    let mut bot = TelegramClient::new(TlsStream::new(), Esp32Clock::new(), config.bot_token.clone());

    let mut service = HubService::new(&config);
    service.start(&mut hw, &mut sink);

    info!("System ready. Entering main loop.");

    // ── 6. Node loop ──────────────────────────────────────────
    loop {
        service.tick(&FLAME_TRIGGER, &mut bot, &mut hw, &clock, &mut sink);

        hw.service();

        // Yield to the IDLE task so the task watchdog stays fed.
        clock.delay_ms(10);
    }
}
