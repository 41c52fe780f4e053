//! Mock port implementations for integration tests.
//!
//! Record every interaction so tests can assert on the full call
//! history without touching real GPIO, sockets, or the camera.

use std::cell::{Cell, RefCell};

use homeguard::app::events::AppEvent;
use homeguard::app::ports::{
    BotPort, Clock, EventSink, InboundMessage, ProbePort, SignalPort, UploadPort,
};
use homeguard::{CaptureError, Error};

// ── Message helper ────────────────────────────────────────────

#[allow(dead_code)]
pub fn msg(update_id: i64, chat_id: &str, text: &str) -> InboundMessage {
    InboundMessage {
        update_id,
        chat_id: chat_id.to_string(),
        text: text.to_string(),
        from_name: "Tester".to_string(),
    }
}

// ── MockBot ───────────────────────────────────────────────────

/// Serves scripted update batches (one per `poll_updates` call) and
/// records every outbound message.
pub struct MockBot {
    pub batches: Vec<Vec<InboundMessage>>,
    pub sent: Vec<(String, String)>,
    pub requested_after: Vec<i64>,
}

#[allow(dead_code)]
impl MockBot {
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
            sent: Vec::new(),
            requested_after: Vec::new(),
        }
    }

    pub fn with_batches(batches: Vec<Vec<InboundMessage>>) -> Self {
        let mut bot = Self::new();
        bot.batches = batches;
        bot
    }

    pub fn sent_texts(&self) -> Vec<&str> {
        self.sent.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl BotPort for MockBot {
    fn poll_updates(&mut self, after_id: i64) -> Vec<InboundMessage> {
        self.requested_after.push(after_id);
        if self.batches.is_empty() {
            Vec::new()
        } else {
            self.batches.remove(0)
        }
    }

    fn send_message(&mut self, chat_id: &str, text: &str, _parse_mode: &str) {
        self.sent.push((chat_id.to_string(), text.to_string()));
    }
}

// ── MockUploader ──────────────────────────────────────────────

pub struct MockUploader {
    pub calls: u32,
    pub fail_capture: bool,
    pub response: String,
}

#[allow(dead_code)]
impl MockUploader {
    pub fn new() -> Self {
        Self {
            calls: 0,
            fail_capture: false,
            response: "{\"ok\":true}".to_string(),
        }
    }

    pub fn failing_capture() -> Self {
        let mut up = Self::new();
        up.fail_capture = true;
        up
    }
}

impl UploadPort for MockUploader {
    fn send_photo(&mut self) -> Result<String, Error> {
        self.calls += 1;
        if self.fail_capture {
            Err(Error::Capture(CaptureError::FrameAcquisitionFailed))
        } else {
            Ok(self.response.clone())
        }
    }
}

// ── MockBoard ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Flash(bool),
    Indicator(bool),
    Tone { freq_hz: u32, duration_ms: u32 },
}

pub struct MockBoard {
    pub calls: Vec<BoardCall>,
    pub gas_raw: u16,
    pub flame_high: bool,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            gas_raw: 0,
            flame_high: true,
        }
    }

    pub fn flash_state(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                BoardCall::Flash(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl SignalPort for MockBoard {
    fn set_flash(&mut self, on: bool) {
        self.calls.push(BoardCall::Flash(on));
    }

    fn set_indicator(&mut self, on: bool) {
        self.calls.push(BoardCall::Indicator(on));
    }

    fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.calls.push(BoardCall::Tone {
            freq_hz,
            duration_ms,
        });
    }
}

impl ProbePort for MockBoard {
    fn read_gas_raw(&mut self) -> u16 {
        self.gas_raw
    }

    fn flame_pin_high(&mut self) -> bool {
        self.flame_high
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Deterministic clock: time only moves via `advance()` or `delay_ms`.
/// Every delay is recorded so tests can assert on blocking holds.
pub struct FakeClock {
    now: Cell<u64>,
    pub delays: RefCell<Vec<u32>>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            delays: RefCell::new(Vec::new()),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn delay_ms(&self, ms: u32) {
        self.delays.borrow_mut().push(ms);
        self.now.set(self.now.get() + u64::from(ms));
    }
}

// ── CollectingSink ────────────────────────────────────────────

pub struct CollectingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl CollectingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count_unauthorized(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::UnauthorizedAccess { .. }))
            .count()
    }
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
