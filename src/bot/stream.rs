//! Client stream abstraction — any secured byte-oriented connection.
//!
//! Concrete implementations:
//! - TLS over TCP via ESP-IDF mbedtls (on hardware)
//! - plaintext `std::net::TcpStream` (host simulation / tests)
//!
//! The uploader and API client are generic over `SecuredStream`, so
//! swapping the transport requires zero changes to the protocol logic.
//! The surface mirrors what the firmware actually needs from the network
//! stack: connect, bulk write, single-byte read, readiness, teardown.

/// Byte-oriented client connection.
pub trait SecuredStream {
    /// Error type for this stream.
    type Error: core::fmt::Debug;

    /// Open a connection to `host:port`, performing the TLS handshake
    /// where the implementation carries one.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;

    /// Write `data` to the connection.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read a single byte. Returns `None` if no data is available
    /// (non-blocking) or the connection is closed.
    fn read_byte(&mut self) -> Option<u8>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;

    /// Tear the connection down. Idempotent.
    fn stop(&mut self);
}

/// A null stream that refuses to connect and never reads.
/// Useful as a default when the node runs unprovisioned.
pub struct NullStream;

impl SecuredStream for NullStream {
    type Error = ();

    fn connect(&mut self, _host: &str, _port: u16) -> Result<(), ()> {
        Err(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn read_byte(&mut self) -> Option<u8> {
        None
    }

    fn available(&self) -> bool {
        false
    }

    fn stop(&mut self) {}
}
