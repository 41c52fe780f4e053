//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ node service (domain)
//! ```
//!
//! Driven adapters (bot client, camera, GPIO board, clock, event sinks)
//! implement these traits. The node services consume them via generics,
//! so the domain core never touches hardware or sockets directly.
//!
//! The trait surfaces mirror the external collaborators the
//! firmware consumes: a messaging-service client (`getUpdates` /
//! `sendMessage`), a frame-capture subsystem (acquire/release), and the
//! board's GPIO. Nothing here re-models them into something richer.

use crate::config::DeviceConfig;
use crate::error::{CaptureError, Error};

// ───────────────────────────────────────────────────────────────
// Bot port (driven adapter: messaging service ↔ domain)
// ───────────────────────────────────────────────────────────────

/// One inbound message from the messaging service.
///
/// Ephemeral: produced per polling cycle, dropped after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Service-assigned monotonically increasing update id.
    pub update_id: i64,
    /// Chat id of the requester (compared against the authorised id).
    pub chat_id: String,
    /// Raw command text.
    pub text: String,
    /// Display name of the sender (diagnostics only).
    pub from_name: String,
}

/// The messaging-service client the node polls and replies through.
pub trait BotPort {
    /// Fetch every pending message with an update id >= `after_id`,
    /// in service order (assumed chronological).
    ///
    /// A transport failure is indistinguishable from "no new messages":
    /// implementations log and return an empty batch.
    fn poll_updates(&mut self, after_id: i64) -> Vec<InboundMessage>;

    /// Send a text message. `parse_mode` is passed through verbatim
    /// (empty string for plain text). Failures are logged, not returned —
    /// replies are best-effort.
    fn send_message(&mut self, chat_id: &str, text: &str, parse_mode: &str);
}

// ───────────────────────────────────────────────────────────────
// Capture port (driven adapter: camera hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Frame-capture subsystem. One frame is in flight at most: acquire,
/// serialise into the upload body, release. Never retained across loop
/// iterations.
pub trait CapturePort {
    /// Opaque frame handle; `as_ref()` yields the JPEG bytes.
    type Frame: AsRef<[u8]>;

    /// Grab the next frame from the capture pipeline.
    fn acquire_frame(&mut self) -> Result<Self::Frame, CaptureError>;

    /// Hand the frame buffer back to the capture pipeline.
    fn release_frame(&mut self, frame: Self::Frame);
}

// ───────────────────────────────────────────────────────────────
// Upload port (domain → photo transfer)
// ───────────────────────────────────────────────────────────────

/// Photo transfer to the messaging service.
///
/// `Ok(body)` is returned for every completed transfer attempt — including
/// a failed connect, which yields a fixed sentinel body rather than an
/// error. `Err(Error::Capture(_))` is reserved for frame-acquisition
/// failure, which the node treats as unrecoverable (restart policy lives
/// in the binary).
pub trait UploadPort {
    fn send_photo(&mut self) -> Result<String, Error>;
}

// ───────────────────────────────────────────────────────────────
// Board ports (domain → GPIO, sensors → domain)
// ───────────────────────────────────────────────────────────────

/// Write-side port: indicator outputs on the board.
pub trait SignalPort {
    /// Camera flash LED (camera node; no-op wiring on the hub).
    fn set_flash(&mut self, on: bool);

    /// Red alert indicator LED.
    fn set_indicator(&mut self, on: bool);

    /// Sound the buzzer. Fire-and-forget: the tone ends after
    /// `duration_ms` without blocking the caller.
    fn tone(&mut self, freq_hz: u32, duration_ms: u32);
}

/// Read-side port: on-demand sensor reads (sensor hub).
pub trait ProbePort {
    /// Raw ADC reading from the gas sensor.
    fn read_gas_raw(&mut self) -> u16;

    /// Current flame-sensor pin level. The sensor is active LOW:
    /// HIGH means "no flame in sight".
    fn flame_pin_high(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Time and system control
// ───────────────────────────────────────────────────────────────

/// Monotonic time source plus blocking delay.
pub trait Clock {
    /// Milliseconds since boot (monotonic).
    fn now_ms(&self) -> u64;

    /// Blocking delay. Stalls the whole cooperative loop; there are no
    /// other tasks to starve.
    fn delay_ms(&self, ms: u32);
}

/// Device-level control. `restart` diverges on real hardware; the host
/// simulation records the request so tests can assert the fail-fast path.
pub trait SystemPort {
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// the trait exists so a future uplink can subscribe without touching
/// the services).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists device configuration.
///
/// Credentials (WiFi password, bot token) live behind this port rather
/// than as compiled-in literals; implementations should keep them in the
/// encrypted NVS partition on real hardware.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<DeviceConfig, ConfigError>;

    /// Persist configuration.
    fn save(&self, config: &DeviceConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
