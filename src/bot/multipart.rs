//! Multipart/form-data framing for the photo upload.
//!
//! The wire format is fixed and must stay bit-exact for the bot API
//! usage this firmware was built against: boundary token `PR_IoT`,
//! field order `chat_id` then `photo`, filename `esp32-cam.jpg`,
//! content-type `image/jpeg`, `\r\n` line endings throughout. That
//! includes the stray `; ` after the `chat_id` disposition — the service
//! accepts it and peer devices were validated against these exact bytes.

/// Multipart boundary token.
pub const BOUNDARY: &str = "PR_IoT";

/// Filename reported for the photo part.
pub const PHOTO_FILENAME: &str = "esp32-cam.jpg";

const TAIL: &str = "\r\n--PR_IoT--\r\n";

/// Pre-rendered head + tail of the multipart body. The image bytes are
/// streamed between the two, so the form never owns the payload.
pub struct PhotoForm {
    head: String,
}

impl PhotoForm {
    /// Build the form framing for one upload addressed to `chat_id`.
    pub fn new(chat_id: &str) -> Self {
        let head = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"chat_id\"; \r\n\r\n\
             {chat_id}\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"photo\"; filename=\"{PHOTO_FILENAME}\"\r\n\
             Content-Type: image/jpeg\r\n\r\n"
        );
        Self { head }
    }

    /// Everything that precedes the image bytes.
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Everything that follows the image bytes.
    pub fn tail() -> &'static str {
        TAIL
    }

    /// `Content-Length` for a body carrying `image_len` photo bytes.
    pub fn content_length(&self, image_len: usize) -> usize {
        self.head.len() + image_len + TAIL.len()
    }
}

// ── Tests ────────────────────────────────────────────────────
