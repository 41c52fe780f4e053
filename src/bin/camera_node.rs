//! HomeGuard camera node — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  BoardAdapter    EspCamera     TelegramClient   NvsAdapter │
//! │  (Signal)        (Capture)     (Bot)            (Config)   │
//! │  TlsStream       Esp32Clock    LogEventSink               │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ────────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │        CameraService + PhotoUploader             │      │
//! │  │  photo request · motion alert · command poll     │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop is single-threaded and cooperative: the only interrupt-context
//! code is the motion ISR's atomic flag store.

use anyhow::Result;
use log::{error, info, warn};

use homeguard::adapters::camera::EspCamera;
use homeguard::adapters::hardware::BoardAdapter;
use homeguard::adapters::log_sink::LogEventSink;
use homeguard::adapters::nvs::NvsAdapter;
use homeguard::adapters::time::{Esp32Clock, Esp32System};
use homeguard::adapters::tls::TlsStream;
use homeguard::adapters::wifi::WifiStation;
use homeguard::app::camera::CameraService;
use homeguard::app::ports::{Clock, ConfigPort, SystemPort};
use homeguard::bot::client::TelegramClient;
use homeguard::bot::upload::PhotoUploader;
use homeguard::config::DeviceConfig;
use homeguard::drivers::hw_init;
use homeguard::triggers::MOTION_TRIGGER;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("HomeGuard camera node v{}", env!("CARGO_PKG_VERSION"));

    // The camera XCLK + WiFi join current spike trips the brown-out
    // detector on marginal USB supplies.
    hw_init::disable_brownout_detector();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_camera_board() {
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

    // ── 5. Camera pipeline ────────────────────────────────────
    // An init failure is logged but not fatal here: the first capture
    // attempt will fail and take the restart path, same as a mid-life
    // camera fault.
    let mut camera = EspCamera::new();
    if let Err(e) = camera.init() {
        warn!("camera init failed: {}", e);
    }

    // ── 6. Adapters + service ─────────────────────────────────
    let mut hw = BoardAdapter::for_camera_node();
    let mut sink = LogEventSink::new();
    let mut bot = TelegramClient::new(TlsStream::new(), Esp32Clock::new(), config.bot_token.clone());
    let mut uploader = PhotoUploader::new(
        TlsStream::new(),
        camera,
        Esp32Clock::new(),
        config.bot_token.clone(),
        config.authorized_chat_id.clone(),
        config.upload_response_timeout_ms,
    );

    let mut service = CameraService::new(&config);
    service.start(&mut hw, &mut sink);

    info!("System ready. Entering main loop.");

    // ── 7. Node loop ──────────────────────────────────────────
    loop {
        if let Err(e) = service.tick(
            &MOTION_TRIGGER,
            &mut bot,
            &mut uploader,
            &mut hw,
            &clock,
            &mut sink,
        ) {
            // Frame acquisition failure — fail-fast restart.
            error!("tick failed: {} — restarting", e);
            clock.delay_ms(1000);
            system.restart();
        }

        hw.service();

        // Yield to the IDLE task so the task watchdog stays fed.
        clock.delay_ms(10);
    }
}
