//! Messaging-service protocol slice.
//!
//! Everything that touches the bot API wire format lives here: the
//! byte-oriented client stream abstraction, the multipart photo form,
//! the minimal HTTP response reader, the photo uploader,
//! and a compact `getUpdates`/`sendMessage` client.
//!
//! The slice is transport-generic — adapters provide a real TLS stream
//! on hardware and tests drive it with scripted in-memory streams.

pub mod client;
pub mod http;
pub mod multipart;
pub mod stream;
pub mod upload;

/// Bot API endpoint. The TLS adapter pins the service root CA to it.
pub const TELEGRAM_HOST: &str = "api.telegram.org";
pub const TELEGRAM_PORT: u16 = 443;
