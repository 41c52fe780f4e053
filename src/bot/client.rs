//! Compact bot API client: `getUpdates` polling and `sendMessage` replies.
//!
//! One short-lived HTTPS request per call — connect, write a GET, scrape
//! the JSON body with the minimal reader, tear down. Transport failures
//! degrade to "zero new messages" / a dropped reply with a warning; the
//! node's poll loop cannot tell the difference, and that is the intended
//! failure policy.

use log::warn;
use serde::Deserialize;

use crate::app::ports::{BotPort, Clock, InboundMessage};
use crate::error::BotError;

use super::http;
use super::stream::SecuredStream;
use super::{TELEGRAM_HOST, TELEGRAM_PORT};

/// Cap on updates fetched per request; the poll loop refetches until the
/// backlog is drained, so this only bounds a single round-trip.
const UPDATE_BATCH_LIMIT: u32 = 10;

/// How long to wait for an API response body before giving up on a poll.
const API_RESPONSE_TIMEOUT_MS: u64 = 5000;

pub struct TelegramClient<S: SecuredStream, K: Clock> {
    stream: S,
    clock: K,
    token: heapless::String<64>,
}

impl<S: SecuredStream, K: Clock> TelegramClient<S, K> {
    pub fn new(stream: S, clock: K, token: heapless::String<64>) -> Self {
        Self {
            stream,
            clock,
            token,
        }
    }

    /// One GET round-trip. `None` on connect failure or an empty body.
    fn request(&mut self, path_and_query: &str) -> Option<String> {
        if self
            .stream
            .connect(TELEGRAM_HOST, TELEGRAM_PORT)
            .is_err()
        {
            warn!("Connected to {} failed.", TELEGRAM_HOST);
            return None;
        }

        http::write_line(
            &mut self.stream,
            &format!("GET {path_and_query} HTTP/1.1"),
        );
        http::write_line(&mut self.stream, &format!("Host: {TELEGRAM_HOST}"));
        http::write_line(&mut self.stream, "Connection: close");
        http::write_line(&mut self.stream, "");

        let body =
            http::read_minimal_http_body(&mut self.stream, API_RESPONSE_TIMEOUT_MS, &self.clock);
        self.stream.stop();

        if body.is_empty() { None } else { Some(body) }
    }
}

impl<S: SecuredStream, K: Clock> BotPort for TelegramClient<S, K> {
    fn poll_updates(&mut self, after_id: i64) -> Vec<InboundMessage> {
        let path = format!(
            "/bot{}/getUpdates?offset={after_id}&limit={UPDATE_BATCH_LIMIT}",
            self.token
        );
        let Some(body) = self.request(&path) else {
            return Vec::new();
        };
        match parse_updates(&body) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("getUpdates: {e}");
                Vec::new()
            }
        }
    }

    fn send_message(&mut self, chat_id: &str, text: &str, parse_mode: &str) {
        let mut path = format!(
            "/bot{}/sendMessage?chat_id={chat_id}&text={}",
            self.token,
            url_encode(text)
        );
        if !parse_mode.is_empty() {
            path.push_str("&parse_mode=");
            path.push_str(parse_mode);
        }
        if self.request(&path).is_none() {
            warn!("sendMessage to {chat_id} dropped");
        }
    }
}

// ── Response parsing ──────────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<ApiUpdate>,
}

#[derive(Deserialize)]
struct ApiUpdate {
    update_id: i64,
    message: Option<ApiMessage>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    text: String,
    chat: ApiChat,
    from: Option<ApiUser>,
}

#[derive(Deserialize)]
struct ApiChat {
    id: i64,
}

#[derive(Deserialize)]
struct ApiUser {
    #[serde(default)]
    first_name: String,
}

/// Parse a `getUpdates` response body into inbound messages, preserving
/// service order. Updates without a message payload (edited messages,
/// channel posts) are skipped — this bot only serves private text chats.
pub fn parse_updates(body: &str) -> Result<Vec<InboundMessage>, BotError> {
    let resp: ApiResponse =
        serde_json::from_str(body).map_err(|_| BotError::MalformedResponse)?;
    if !resp.ok {
        return Err(BotError::MalformedResponse);
    }
    Ok(resp
        .result
        .into_iter()
        .filter_map(|u| {
            let m = u.message?;
            Some(InboundMessage {
                update_id: u.update_id,
                chat_id: m.chat.id.to_string(),
                text: m.text,
                from_name: m.from.map(|f| f.first_name).unwrap_or_default(),
            })
        })
        .collect())
}

// ── URL encoding ──────────────────────────────────────────────

/// Percent-encode everything outside the unreserved set. Message text
/// rides in the query string, so newlines in the welcome text must
/// survive the trip.
pub fn url_encode(text: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(text.len());
    for b in text.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(HEX[usize::from(b >> 4)] as char);
                out.push(HEX[usize::from(b & 0x0F)] as char);
            }
        }
    }
    out
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATES_BODY: &str = r#"{
        "ok": true,
        "result": [
            {
                "update_id": 101,
                "message": {
                    "message_id": 7,
                    "from": {"id": 42, "first_name": "Paolo"},
                    "chat": {"id": 987654321, "type": "private"},
                    "text": "/gas"
                }
            },
            {
                "update_id": 102,
                "message": {
                    "message_id": 8,
                    "from": {"id": 43, "first_name": "Mallory"},
                    "chat": {"id": 111, "type": "private"},
                    "text": "/flame"
                }
            }
        ]
    }"#;

    #[test]
    fn parses_updates_in_service_order() {
        let msgs = parse_updates(UPDATES_BODY).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].update_id, 101);
        assert_eq!(msgs[0].chat_id, "987654321");
        assert_eq!(msgs[0].text, "/gas");
        assert_eq!(msgs[0].from_name, "Paolo");
        assert_eq!(msgs[1].update_id, 102);
        assert_eq!(msgs[1].chat_id, "111");
    }

    #[test]
    fn empty_result_parses_to_no_messages() {
        let msgs = parse_updates(r#"{"ok":true,"result":[]}"#).unwrap();
        assert!(msgs.is_empty());
    }

    #[test]
    fn not_ok_response_is_malformed() {
        assert_eq!(
            parse_updates(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#),
            Err(BotError::MalformedResponse)
        );
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert_eq!(
            parse_updates("<html>502 Bad Gateway</html>"),
            Err(BotError::MalformedResponse)
        );
    }

    #[test]
    fn updates_without_message_payload_are_skipped() {
        let body = r#"{"ok":true,"result":[{"update_id":5},{"update_id":6,
            "message":{"chat":{"id":1},"text":"/start"}}]}"#;
        let msgs = parse_updates(body).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].update_id, 6);
        assert_eq!(msgs[0].from_name, "");
    }

    #[test]
    fn url_encode_passes_unreserved_and_escapes_the_rest() {
        assert_eq!(url_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(url_encode("a b"), "a%20b");
        assert_eq!(url_encode("line1\nline2"), "line1%0Aline2");
        assert_eq!(url_encode("50%"), "50%25");
        assert_eq!(url_encode("/gas"), "%2Fgas");
    }
}
