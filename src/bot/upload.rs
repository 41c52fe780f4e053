//! Photo uploader — multipart POST of one camera frame to the bot API.
//!
//! The transfer is hand-rolled HTTP/1.1 over a [`SecuredStream`]: request
//! line and headers first, then the multipart head, the JPEG streamed in
//! fixed-size chunks, and the multipart tail. The frame buffer goes back
//! to the capture pipeline *before* the response wait so the camera can
//! refill while the network round-trip completes; the connection stays up
//! until a body arrives or the timeout lapses.
//!
//! Failure policy (matches the node's error taxonomy):
//! - frame acquisition failure → `Err(Error::Capture(_))`, the one
//!   unrecoverable case;
//! - connect failure → `Ok` with a fixed sentinel body, no retry.

use log::{info, warn};

use crate::app::ports::{CapturePort, Clock, UploadPort};
use crate::error::Error;

use super::http;
use super::multipart::{BOUNDARY, PhotoForm};
use super::stream::SecuredStream;
use super::{TELEGRAM_HOST, TELEGRAM_PORT};

/// Image bytes are streamed in chunks of this size; the final chunk is
/// the remainder, and an exact multiple emits no empty trailing chunk.
pub const UPLOAD_CHUNK_SIZE: usize = 1024;

/// Body returned when the TLS connect fails.
pub const CONNECT_FAILED_BODY: &str = "Connected to api.telegram.org failed.";

/// Owns the upload connection plus the capture pipeline for the duration
/// of the node's lifetime. One upload is in flight at most — the stream
/// is reused sequentially, never concurrently.
pub struct PhotoUploader<S: SecuredStream, C: CapturePort, K: Clock> {
    stream: S,
    camera: C,
    clock: K,
    bot_token: heapless::String<64>,
    chat_id: heapless::String<24>,
    response_timeout_ms: u64,
}

impl<S: SecuredStream, C: CapturePort, K: Clock> PhotoUploader<S, C, K> {
    pub fn new(
        stream: S,
        camera: C,
        clock: K,
        bot_token: heapless::String<64>,
        chat_id: heapless::String<24>,
        response_timeout_ms: u64,
    ) -> Self {
        Self {
            stream,
            camera,
            clock,
            bot_token,
            chat_id,
            response_timeout_ms,
        }
    }
}

impl<S: SecuredStream, C: CapturePort, K: Clock> UploadPort for PhotoUploader<S, C, K> {
    fn send_photo(&mut self) -> Result<String, Error> {
        let frame = self.camera.acquire_frame().map_err(Error::Capture)?;

        info!("Connect to {}", TELEGRAM_HOST);
        if self.stream.connect(TELEGRAM_HOST, TELEGRAM_PORT).is_err() {
            // The frame still goes back even though nothing was sent.
            self.camera.release_frame(frame);
            warn!("{}", CONNECT_FAILED_BODY);
            return Ok(String::from(CONNECT_FAILED_BODY));
        }
        info!("Connection successful");

        let form = PhotoForm::new(self.chat_id.as_str());
        let image_len = frame.as_ref().len();
        let total_len = form.content_length(image_len);

        http::write_line(
            &mut self.stream,
            &format!("POST /bot{}/sendPhoto HTTP/1.1", self.bot_token),
        );
        http::write_line(&mut self.stream, &format!("Host: {TELEGRAM_HOST}"));
        http::write_line(&mut self.stream, &format!("Content-Length: {total_len}"));
        http::write_line(
            &mut self.stream,
            &format!("Content-Type: multipart/form-data; boundary={BOUNDARY}"),
        );
        http::write_line(&mut self.stream, "");
        http::write_all(&mut self.stream, form.head().as_bytes());

        // floor(L / 1024) full chunks, then the remainder iff L % 1024 != 0.
        for chunk in frame.as_ref().chunks(UPLOAD_CHUNK_SIZE) {
            http::write_all(&mut self.stream, chunk);
        }

        http::write_all(&mut self.stream, PhotoForm::tail().as_bytes());

        // Release before the response wait; the camera can refill while
        // the service processes the upload.
        self.camera.release_frame(frame);

        let body =
            http::read_minimal_http_body(&mut self.stream, self.response_timeout_ms, &self.clock);
        self.stream.stop();
        info!("{}", body);

        Ok(body)
    }
}

// ── Tests ────────────────────────────────────────────────────
