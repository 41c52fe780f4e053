//! Fuzz target: `bot::http::read_minimal_http_body`
//!
//! Drives arbitrary byte sequences through the minimal response reader
//! and asserts that it never panics and never fabricates more body
//! bytes than were on the wire.
//!
//! cargo fuzz run fuzz_http_body

#![no_main]

use core::cell::Cell;

use homeguard::app::ports::Clock;
use homeguard::bot::http::read_minimal_http_body;
use homeguard::bot::stream::SecuredStream;
use libfuzzer_sys::fuzz_target;

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

struct CannedStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl SecuredStream for CannedStream<'_> {
    type Error = ();

    fn connect(&mut self, _host: &str, _port: u16) -> Result<(), ()> {
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn read_byte(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn available(&self) -> bool {
        self.pos < self.data.len()
    }

    fn stop(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let mut stream = CannedStream { data, pos: 0 };
    let clock = InstantClock { now: Cell::new(0) };

    let body = read_minimal_http_body(&mut stream, 10_000, &clock);

    // Each wire byte contributes at most one body character.
    assert!(body.chars().count() <= data.len());
});
