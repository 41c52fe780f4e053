//! TLS client stream adapter.
//!
//! Implements [`SecuredStream`](crate::bot::stream::SecuredStream) — the
//! byte-oriented client connection the bot slice runs over.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::tls::EspTls` (mbedtls) with
//!   the IDF certificate bundle, so the bot API's root CA is validated
//!   without shipping a pinned PEM.
//! - **all other targets**: plaintext `std::net::TcpStream` in
//!   non-blocking mode for host-side testing — the wire logic is
//!   identical, only the crypto is absent.
//!
//! One connection at a time: `connect` on an open stream tears the old
//! one down first. Reads are non-blocking — `read_byte` returns `None`
//! when nothing is pending rather than stalling the node loop.

use core::fmt;
use log::{info, warn};

use crate::bot::stream::SecuredStream;

#[cfg(not(target_os = "espidf"))]
use std::io::{Read, Write};

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

/// Errors originating from the TLS client stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsError {
    /// TCP/socket I/O failure (including DNS resolution).
    Io,
    /// TLS handshake or session error.
    Tls,
    /// Operation requires an open connection but none is present.
    NotConnected,
}

impl fmt::Display for TlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "TCP/socket I/O error"),
            Self::Tls => write!(f, "TLS handshake or session error"),
            Self::NotConnected => write!(f, "no open connection"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// TlsStream
// ───────────────────────────────────────────────────────────────

pub struct TlsStream {
    #[cfg(target_os = "espidf")]
    session: Option<esp_idf_svc::tls::EspTls>,

    #[cfg(not(target_os = "espidf"))]
    stream: Option<std::net::TcpStream>,
}

impl TlsStream {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            session: None,
            #[cfg(not(target_os = "espidf"))]
            stream: None,
        }
    }

    pub fn is_open(&self) -> bool {
        #[cfg(target_os = "espidf")]
        {
            self.session.is_some()
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.stream.is_some()
        }
    }
}

impl Default for TlsStream {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// SecuredStream implementation
// ───────────────────────────────────────────────────────────────

impl SecuredStream for TlsStream {
    type Error = TlsError;

    #[cfg(target_os = "espidf")]
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TlsError> {
        self.stop();

        let mut tls = esp_idf_svc::tls::EspTls::new().map_err(|_| TlsError::Tls)?;
        let cfg = esp_idf_svc::tls::Config {
            common_name: Some(host),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            non_block: true,
            ..Default::default()
        };
        tls.connect(host, port, &cfg).map_err(|e| {
            warn!("TLS: connect to {host}:{port} failed ({e})");
            TlsError::Tls
        })?;

        info!("TLS: connected to {host}:{port}");
        self.session = Some(tls);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TlsError> {
        self.stop();

        let stream = std::net::TcpStream::connect((host, port)).map_err(|e| {
            warn!("TLS(sim): connect to {host}:{port} failed ({e})");
            TlsError::Io
        })?;
        stream.set_nonblocking(true).map_err(|_| TlsError::Io)?;

        info!("TLS(sim): connected to {host}:{port} (plaintext)");
        self.stream = Some(stream);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn write(&mut self, data: &[u8]) -> Result<usize, TlsError> {
        let Some(session) = self.session.as_mut() else {
            return Err(TlsError::NotConnected);
        };
        match session.write(data) {
            Ok(n) => Ok(n),
            Err(_) => {
                self.session = None;
                Err(TlsError::Io)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write(&mut self, data: &[u8]) -> Result<usize, TlsError> {
        let stream = self.stream.as_mut().ok_or(TlsError::NotConnected)?;
        loop {
            match stream.write(data) {
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    // Socket buffer full mid-upload; yield briefly and retry.
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                Err(_) => {
                    self.stream.take();
                    return Err(TlsError::Io);
                }
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_byte(&mut self) -> Option<u8> {
        let session = self.session.as_mut()?;
        let mut buf = [0u8; 1];
        match session.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_byte(&mut self) -> Option<u8> {
        let stream = self.stream.as_mut()?;
        let mut buf = [0u8; 1];
        match stream.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => {
                // EOF — peer closed after sending the response.
                self.stream.take();
                None
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => None,
            Err(_) => {
                self.stream.take();
                None
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn available(&self) -> bool {
        // EspTls carries no readiness query; the non-blocking read_byte
        // is the probe. Report readable whenever a session is open.
        self.session.is_some()
    }

    #[cfg(not(target_os = "espidf"))]
    fn available(&self) -> bool {
        let Some(stream) = self.stream.as_ref() else {
            return false;
        };
        let mut buf = [0u8; 1];
        matches!(stream.peek(&mut buf), Ok(n) if n > 0)
    }

    fn stop(&mut self) {
        #[cfg(target_os = "espidf")]
        if self.session.take().is_some() {
            info!("TLS: connection closed");
        }

        #[cfg(not(target_os = "espidf"))]
        if self.stream.take().is_some() {
            info!("TLS(sim): connection closed");
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (host / simulation path only)
// ───────────────────────────────────────────────────────────────
