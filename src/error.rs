//! Unified error types for the HomeGuard firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level node loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply passed back up through the
//! tick path without allocation.
//!
//! An upload *connection* failure is not an `Error`: the uploader reports
//! it as a fixed sentinel body string and the node carries on (no retry,
//! no restart). Only frame acquisition failure and boot-time network join
//! failure are fatal.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The camera could not produce a frame buffer. Fail-fast: the node
    /// restarts rather than retrying with a wedged capture pipeline.
    Capture(CaptureError),
    /// WiFi join / network bring-up failed.
    Connect(ConnectError),
    /// The bot API client failed at the transport or parse level.
    Bot(BotError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture(e) => write!(f, "capture: {e}"),
            Self::Connect(e) => write!(f, "connect: {e}"),
            Self::Bot(e) => write!(f, "bot: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Capture errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The camera driver returned a null frame buffer.
    FrameAcquisitionFailed,
    /// Camera peripheral was never initialised (or init failed).
    NotInitialised,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameAcquisitionFailed => write!(f, "frame acquisition failed"),
            Self::NotInitialised => write!(f, "camera not initialised"),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Connectivity errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// No credentials configured.
    NoCredentials,
    /// SSID failed validation (must be 1-32 printable ASCII bytes).
    InvalidSsid,
    /// Password failed validation (8-64 bytes for WPA2, or empty for open).
    InvalidPassword,
    /// The join did not complete within the boot timeout window.
    JoinTimeout,
    /// Driver-level connect call failed.
    DriverFailed,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid"),
            Self::InvalidPassword => write!(f, "password invalid"),
            Self::JoinTimeout => write!(f, "join timed out"),
            Self::DriverFailed => write!(f, "WiFi driver call failed"),
        }
    }
}

impl From<ConnectError> for Error {
    fn from(e: ConnectError) -> Self {
        Self::Connect(e)
    }
}

// ---------------------------------------------------------------------------
// Bot API errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotError {
    /// TLS connect to the API host failed.
    ConnectFailed,
    /// Writing the request failed mid-stream.
    WriteFailed,
    /// The response body never arrived within the timeout.
    ResponseTimeout,
    /// The response body was not valid API JSON.
    MalformedResponse,
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "API connect failed"),
            Self::WriteFailed => write!(f, "request write failed"),
            Self::ResponseTimeout => write!(f, "response timed out"),
            Self::MalformedResponse => write!(f, "malformed API response"),
        }
    }
}

impl From<BotError> for Error {
    fn from(e: BotError) -> Self {
        Self::Bot(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
