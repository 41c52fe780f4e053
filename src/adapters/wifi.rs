//! WiFi station-mode adapter.
//!
//! Brings the station interface up once at boot and polls the join at
//! 5 attempts per second until the configured timeout. The caller owns
//! the timeout policy: a `JoinTimeout` at boot means the binary restarts
//! the device rather than retrying indefinitely (a half-connected node
//! is worth less than a rebooted one).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::EspWifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::{error, info};

use crate::app::ports::Clock;
use crate::error::ConnectError;

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

/// Join poll cadence: 5 probes per second.
const JOIN_POLL_MS: u32 = 200;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi station adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiStation {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    timeout_secs: u32,

    #[cfg(target_os = "espidf")]
    driver: Option<Box<esp_idf_svc::wifi::EspWifi<'static>>>,

    /// Simulation: how many join polls pass before the AP "answers";
    /// `u32::MAX` simulates a dead AP for the timeout path.
    #[cfg(not(target_os = "espidf"))]
    sim_join_after_polls: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_polls: u32,
}

impl WifiStation {
    pub fn new(timeout_secs: u32) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            timeout_secs,
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim_join_after_polls: 2,
            #[cfg(not(target_os = "espidf"))]
            sim_polls: 0,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|_| ConnectError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|_| ConnectError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    /// Bring the station up and block until the join completes or the
    /// configured timeout lapses (5 probes/second).
    pub fn connect_blocking(&mut self, clock: &impl Clock) -> Result<(), ConnectError> {
        if self.ssid.is_empty() {
            return Err(ConnectError::NoCredentials);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;
        self.platform_begin()?;

        let max_polls = self.timeout_secs * 1000 / JOIN_POLL_MS;
        for _ in 0..max_polls {
            if self.platform_is_joined() {
                self.state = WifiState::Connected;
                info!("WiFi: connected to '{}'", self.ssid);
                return Ok(());
            }
            clock.delay_ms(JOIN_POLL_MS);
        }

        error!("WiFi: join timed out after {}s", self.timeout_secs);
        self.state = WifiState::Failed;
        Err(ConnectError::JoinTimeout)
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Make the simulated AP unreachable (exercises the timeout path).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_unreachable(&mut self) {
        self.sim_join_after_polls = u32::MAX;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_begin(&mut self) -> Result<(), ConnectError> {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::hal::peripherals::Peripherals;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

        if self.driver.is_some() {
            return Ok(());
        }

        let peripherals = Peripherals::take().map_err(|_| ConnectError::DriverFailed)?;
        let sysloop = EspSystemEventLoop::take().map_err(|_| ConnectError::DriverFailed)?;
        let nvs = EspDefaultNvsPartition::take().map_err(|_| ConnectError::DriverFailed)?;

        let mut wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))
            .map_err(|_| ConnectError::DriverFailed)?;

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        }))
        .map_err(|_| ConnectError::DriverFailed)?;

        wifi.start().map_err(|_| ConnectError::DriverFailed)?;
        wifi.connect().map_err(|_| ConnectError::DriverFailed)?;

        self.driver = Some(Box::new(wifi));
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin(&mut self) -> Result<(), ConnectError> {
        self.sim_polls = 0;
        info!("WiFi(sim): station started");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_joined(&mut self) -> bool {
        let Some(driver) = self.driver.as_ref() else {
            return false;
        };
        driver.is_connected().unwrap_or(false) && driver.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_joined(&mut self) -> bool {
        if self.sim_join_after_polls == u32::MAX {
            return false;
        }
        self.sim_polls += 1;
        self.sim_polls > self.sim_join_after_polls
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
