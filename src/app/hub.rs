//! Sensor hub service.
//!
//! Structurally the camera node's sibling, minus the capture pipeline:
//! the flame trigger runs a tone-and-message alert path with a 1-second
//! blocking hold (the loop owns the whole device, so the stall bounds
//! flame re-detection latency at one second), and the command set
//! reports sensors instead of driving a camera.

use log::{debug, info};

use crate::config::DeviceConfig;
use crate::triggers::TriggerFlag;

use super::commands::{HubCommand, UNAUTHORIZED_REPLY, WELCOME_TEXT};
use super::events::AppEvent;
use super::poller::CommandPoller;
use super::ports::{BotPort, Clock, EventSink, InboundMessage, ProbePort, SignalPort};

/// Alert text sent when the flame path fires.
pub const FLAME_ALERT_TEXT: &str = "Fire detected!";

const GAS_REPLY_PREFIX: &str = "Gas sensor value: ";
const FLAME_REPLY_PREFIX: &str = "Flame sensor: ";
const FLAME_CLEAR_TEXT: &str = "No flame in sight!";
const FLAME_PRESENT_TEXT: &str = "Flame detected!";

const ALERT_TONE_HZ: u32 = 1000;
const ALERT_TONE_MS: u32 = 1000;
const ALERT_HOLD_MS: u32 = 1000;

pub struct HubService {
    authorized_chat_id: heapless::String<24>,
    poller: CommandPoller,
}

impl HubService {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            authorized_chat_id: config.authorized_chat_id.clone(),
            poller: CommandPoller::new(config.poll_interval_ms),
        }
    }

    /// Drive outputs to their boot state and announce startup.
    pub fn start(&mut self, hw: &mut impl SignalPort, sink: &mut impl EventSink) {
        hw.set_indicator(false);
        hw.tone(800, 2000);
        sink.emit(&AppEvent::Started { node: "sensor-hub" });
        info!("sensor hub service started");
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one main-loop iteration.
    ///
    /// The `hw` parameter satisfies **both** [`SignalPort`] and
    /// [`ProbePort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        flame: &TriggerFlag,
        bot: &mut impl BotPort,
        hw: &mut (impl SignalPort + ProbePort),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) {
        // 1. Flame alert path. The hold delay blocks the whole loop —
        //    flame re-detection cannot be observed for up to one second.
        if flame.is_raised() {
            bot.send_message(&self.authorized_chat_id, FLAME_ALERT_TEXT, "");
            sink.emit(&AppEvent::FlameAlert);

            hw.set_indicator(true);
            hw.tone(ALERT_TONE_HZ, ALERT_TONE_MS);
            clock.delay_ms(ALERT_HOLD_MS);
            hw.set_indicator(false);

            flame.clear();
        }

        // 2. Interval-paced poll; drain the whole backlog in one burst.
        if self.poller.due(clock.now_ms()) {
            loop {
                let batch = self.poller.next_batch(bot);
                if batch.is_empty() {
                    break;
                }
                debug!("handling {} new message(s)", batch.len());
                for msg in &batch {
                    self.handle_message(msg, bot, hw, sink);
                }
            }
            self.poller.mark_complete(clock.now_ms());
        }
    }

    // ── Command handling ──────────────────────────────────────

    fn handle_message(
        &mut self,
        msg: &InboundMessage,
        bot: &mut impl BotPort,
        hw: &mut impl ProbePort,
        sink: &mut impl EventSink,
    ) {
        if msg.chat_id != self.authorized_chat_id.as_str() {
            bot.send_message(&msg.chat_id, UNAUTHORIZED_REPLY, "");
            sink.emit(&AppEvent::UnauthorizedAccess {
                chat_id: msg.chat_id.clone(),
            });
            return;
        }

        info!("command from {}: {}", msg.from_name, msg.text);

        match HubCommand::parse(&msg.text) {
            Some(HubCommand::ReadGas) => {
                let raw = hw.read_gas_raw();
                let reply = format!("{GAS_REPLY_PREFIX}{raw}");
                bot.send_message(&self.authorized_chat_id, &reply, "");
            }
            Some(HubCommand::ReadFlame) => {
                // Inverted logic: the sensor pulls the pin LOW on flame.
                let status = if hw.flame_pin_high() {
                    FLAME_CLEAR_TEXT
                } else {
                    FLAME_PRESENT_TEXT
                };
                let reply = format!("{FLAME_REPLY_PREFIX}{status}");
                bot.send_message(&self.authorized_chat_id, &reply, "");
            }
            Some(HubCommand::Help) => {
                bot.send_message(&self.authorized_chat_id, WELCOME_TEXT, "");
            }
            None => {
                // Unrecognised text: silently ignored.
                return;
            }
        }

        sink.emit(&AppEvent::CommandHandled {
            text: msg.text.clone(),
        });
    }
}
