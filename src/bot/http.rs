//! Minimal HTTP helpers: request line writing and response-body scraping.
//!
//! [`read_minimal_http_body`] is a faithful port of the byte-at-a-time
//! response reader this firmware has always used. It is **not** an HTTP
//! parser: the header/body split is "first empty line seen", the read
//! stops as soon as the body is non-empty, and any received byte extends
//! the deadline. Chunked transfer encoding and multi-blank-line responses
//! will misparse — the bot API's small JSON replies don't hit either.
//! Keeping the heuristics behind this one function makes them testable in
//! isolation from the transport.

use super::stream::SecuredStream;
use crate::app::ports::Clock;

/// Idle pause between drain attempts while waiting for the response.
const POLL_PAUSE_MS: u32 = 100;

/// Write `data` fully, best-effort. A mid-stream write error does not
/// abort the upload — the subsequent response read comes back empty and
/// the caller reports that instead.
pub(crate) fn write_all<S: SecuredStream>(stream: &mut S, mut data: &[u8]) {
    while !data.is_empty() {
        match stream.write(data) {
            Ok(0) => {
                log::warn!("stream write made no progress");
                return;
            }
            Ok(n) => data = &data[n.min(data.len())..],
            Err(e) => {
                log::warn!("stream write failed: {e:?}");
                return;
            }
        }
    }
}

/// Write a header/request line terminated with `\r\n`.
pub(crate) fn write_line<S: SecuredStream>(stream: &mut S, line: &str) {
    write_all(stream, line.as_bytes());
    write_all(stream, b"\r\n");
}

/// Scrape the response body off `stream`.
///
/// Reads byte-by-byte for up to `timeout_ms` of inactivity: headers are
/// consumed line-by-line until an empty line marks the body start, then
/// bytes accumulate until the drain pass that made the body non-empty
/// ends. Returns an empty string on timeout.
pub fn read_minimal_http_body<S: SecuredStream>(
    stream: &mut S,
    timeout_ms: u64,
    clock: &impl Clock,
) -> String {
    let mut line = String::new();
    let mut body = String::new();
    let mut in_body = false;
    let mut deadline = clock.now_ms() + timeout_ms;

    while clock.now_ms() < deadline {
        clock.delay_ms(POLL_PAUSE_MS);

        while stream.available() {
            let Some(byte) = stream.read_byte() else {
                break;
            };
            let c = byte as char;

            if in_body {
                body.push(c);
            }

            if c == '\n' {
                if line.is_empty() {
                    in_body = true;
                }
                line.clear();
            } else if c != '\r' {
                line.push(c);
            }

            // Any received byte extends the deadline.
            deadline = clock.now_ms() + timeout_ms;
        }

        if !body.is_empty() {
            break;
        }
    }

    body
}

// ── Tests ────────────────────────────────────────────────────
