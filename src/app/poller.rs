//! Update-poll cadence and cursor tracking.
//!
//! The node asks the messaging service for new updates once per fixed
//! interval, measured from the *completion* of the previous poll — not a
//! wall-clock schedule. While a fetch keeps returning messages the poller
//! refetches immediately, so a backlog drains in one burst before the
//! node falls back to interval pacing.
//!
//! The cursor is the highest update id seen so far; the next fetch asks
//! for everything after it. That is the only deduplication performed —
//! ordering within a batch is whatever the service returned.

use super::ports::{BotPort, InboundMessage};

pub struct CommandPoller {
    interval_ms: u64,
    last_poll_done_ms: u64,
    last_update_id: i64,
}

impl CommandPoller {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_poll_done_ms: 0,
            last_update_id: 0,
        }
    }

    /// Whether the poll interval has elapsed since the last completed poll.
    pub fn due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_poll_done_ms) > self.interval_ms
    }

    /// Fetch the next batch of pending messages and advance the cursor.
    /// An empty batch means the backlog is drained (or the transport
    /// failed, which looks the same at this level).
    pub fn next_batch(&mut self, bot: &mut impl BotPort) -> Vec<InboundMessage> {
        let batch = bot.poll_updates(self.last_update_id + 1);
        if let Some(max_id) = batch.iter().map(|m| m.update_id).max() {
            self.last_update_id = max_id;
        }
        batch
    }

    /// Record the completion time of a poll burst; the next poll becomes
    /// due `interval_ms` after this instant.
    pub fn mark_complete(&mut self, now_ms: u64) {
        self.last_poll_done_ms = now_ms;
    }

    /// Highest update id processed so far.
    pub fn cursor(&self) -> i64 {
        self.last_update_id
    }
}
