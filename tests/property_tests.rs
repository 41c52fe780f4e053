//! Property tests for the upload wire format.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use homeguard::CaptureError;
use homeguard::app::ports::{CapturePort, Clock, UploadPort};
use homeguard::bot::multipart::PhotoForm;
use homeguard::bot::stream::SecuredStream;
use homeguard::bot::upload::{PhotoUploader, UPLOAD_CHUNK_SIZE};

use core::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

// ── Minimal doubles ───────────────────────────────────────────

struct InstantClock {
    now: Cell<u64>,
}

impl Clock for InstantClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn delay_ms(&self, ms: u32) {
        self.now.set(self.now.get() + u64::from(ms));
    }
}

/// Records every write into a log shared with the test body.
struct RecordingStream {
    writes: Rc<RefCell<Vec<Vec<u8>>>>,
    response: Vec<u8>,
    pos: usize,
}

impl RecordingStream {
    fn new() -> (Self, Rc<RefCell<Vec<Vec<u8>>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let stream = Self {
            writes: log.clone(),
            response: b"HTTP/1.1 200 OK\r\n\r\n{\"ok\":true}".to_vec(),
            pos: 0,
        };
        (stream, log)
    }
}

impl SecuredStream for RecordingStream {
    type Error = ();

    fn connect(&mut self, _host: &str, _port: u16) -> Result<(), ()> {
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.writes.borrow_mut().push(data.to_vec());
        Ok(data.len())
    }

    fn read_byte(&mut self) -> Option<u8> {
        let b = self.response.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn available(&self) -> bool {
        self.pos < self.response.len()
    }

    fn stop(&mut self) {}
}

struct OneFrameCamera {
    frame: Vec<u8>,
}

impl CapturePort for OneFrameCamera {
    type Frame = Vec<u8>;

    fn acquire_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        Ok(self.frame.clone())
    }

    fn release_frame(&mut self, _frame: Vec<u8>) {}
}

/// Image bytes are marked 0xA5, which never occurs in the ASCII framing,
/// so chunk writes are identifiable in the write log.
const IMAGE_MARKER: u8 = 0xA5;

fn run_upload(image_len: usize) -> Vec<Vec<u8>> {
    let mut token = heapless::String::new();
    token.push_str("12345:TESTTOKEN").unwrap();
    let mut chat = heapless::String::new();
    chat.push_str("777").unwrap();

    let (stream, log) = RecordingStream::new();
    let mut uploader = PhotoUploader::new(
        stream,
        OneFrameCamera {
            frame: vec![IMAGE_MARKER; image_len],
        },
        InstantClock { now: Cell::new(0) },
        token,
        chat,
        10_000,
    );
    uploader.send_photo().unwrap();

    let writes = log.borrow().clone();
    writes
}

proptest! {
    /// For all image byte-lengths L, exactly floor(L/1024) full chunks
    /// are emitted plus one remainder chunk of L mod 1024 bytes, unless
    /// the remainder is zero — then no extra chunk. Total bytes == L.
    #[test]
    fn chunk_emission_matches_floor_plus_remainder(image_len in 0usize..=20_000) {
        let writes = run_upload(image_len);
        let chunk_sizes: Vec<usize> = writes
            .iter()
            .filter(|w| !w.is_empty() && w.iter().all(|&b| b == IMAGE_MARKER))
            .map(Vec::len)
            .collect();

        let full = image_len / UPLOAD_CHUNK_SIZE;
        let remainder = image_len % UPLOAD_CHUNK_SIZE;

        let mut expected = vec![UPLOAD_CHUNK_SIZE; full];
        if remainder > 0 {
            expected.push(remainder);
        }
        prop_assert_eq!(&chunk_sizes, &expected);

        let total: usize = chunk_sizes.iter().sum();
        prop_assert_eq!(total, image_len);
    }

    /// The Content-Length header always equals head + L + tail exactly.
    #[test]
    fn content_length_header_is_exact(image_len in 0usize..=20_000) {
        let writes = run_upload(image_len);
        let wire = writes.concat();
        let text = String::from_utf8_lossy(&wire);

        let form = PhotoForm::new("777");
        let expected = form.content_length(image_len);
        let needle = format!("Content-Length: {}\r\n", expected);
        prop_assert!(text.contains(&needle));
    }

    /// The transmitted body (multipart head + image + tail) is exactly
    /// Content-Length bytes.
    #[test]
    fn body_length_matches_declared_content_length(image_len in 0usize..=8192) {
        let writes = run_upload(image_len);
        let wire = writes.concat();
        let header_end = wire
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("request head terminator")
            + 4;

        let form = PhotoForm::new("777");
        prop_assert_eq!(wire.len() - header_end, form.content_length(image_len));
    }

    /// content_length is linear in L for any chat id.
    #[test]
    fn content_length_formula_is_linear(image_len in 0usize..=1_000_000, chat in "[0-9]{1,12}") {
        let form = PhotoForm::new(&chat);
        prop_assert_eq!(
            form.content_length(image_len),
            form.head().len() + image_len + PhotoForm::tail().len()
        );
    }
}
