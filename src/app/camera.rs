//! Camera node service.
//!
//! Cooperative tick sequence, in order:
//! 1. a photo explicitly requested via `/photo_cam2` is taken and sent;
//! 2. a pending motion detection (with detection enabled) runs the alert
//!    path: message, indicator, photo, tone;
//! 3. interval-paced update polling and command dispatch.
//!
//! All state lives here (no globals except the ISR trigger flag); the
//! toggles reset to their defaults on every boot.

use log::{debug, info};

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::triggers::TriggerFlag;

use super::commands::{CameraCommand, UNAUTHORIZED_REPLY};
use super::events::AppEvent;
use super::poller::CommandPoller;
use super::ports::{BotPort, Clock, EventSink, InboundMessage, SignalPort, UploadPort};

/// Alert text sent when the motion path fires.
pub const MOTION_ALERT_TEXT: &str = "Motion detected on Camera #2!";

const PHOTO_ACK_TEXT: &str = "Photo taken on Camera #2";
const MOTION_ON_TEXT: &str = "Motion detection enabled on Camera #2";
const MOTION_OFF_TEXT: &str = "Motion detection disabled on Camera #2";

/// Alert tone: 1 kHz for 1 s.
const ALERT_TONE_HZ: u32 = 1000;
const ALERT_TONE_MS: u32 = 1000;

pub struct CameraService {
    authorized_chat_id: heapless::String<24>,
    flash_on: bool,
    motion_detection: bool,
    photo_requested: bool,
    poller: CommandPoller,
}

impl CameraService {
    /// Construct the service from configuration. Toggles start at their
    /// boot defaults: flash off, motion detection off, no photo pending.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            authorized_chat_id: config.authorized_chat_id.clone(),
            flash_on: false,
            motion_detection: false,
            photo_requested: false,
            poller: CommandPoller::new(config.poll_interval_ms),
        }
    }

    /// Drive outputs to their boot state and announce startup.
    pub fn start(&mut self, hw: &mut impl SignalPort, sink: &mut impl EventSink) {
        hw.set_flash(self.flash_on);
        hw.set_indicator(false);
        hw.tone(800, 2000);
        sink.emit(&AppEvent::Started {
            node: "camera-node",
        });
        info!("camera service started");
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one main-loop iteration.
    ///
    /// Returns `Err(Error::Capture(_))` if frame acquisition failed during
    /// an upload; the caller owns the restart policy for that case.
    pub fn tick(
        &mut self,
        motion: &TriggerFlag,
        bot: &mut impl BotPort,
        uploader: &mut impl UploadPort,
        hw: &mut impl SignalPort,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        // 1. Explicit photo request from a command.
        if self.photo_requested {
            info!("Sending photo to Telegram...");
            self.photo_requested = false;
            let response = uploader.send_photo()?;
            sink.emit(&AppEvent::PhotoUploaded { response });
        }

        // 2. Motion alert path. The flag is only consumed here, inside the
        //    detection-enabled branch: a detection raised while the toggle
        //    is off stays latched and fires once on re-enable.
        if motion.is_raised() && self.motion_detection {
            bot.send_message(&self.authorized_chat_id, MOTION_ALERT_TEXT, "");
            info!("Motion detected!");
            sink.emit(&AppEvent::MotionAlert);

            hw.set_indicator(true);
            let response = uploader.send_photo()?;
            sink.emit(&AppEvent::PhotoUploaded { response });
            hw.set_indicator(false);
            hw.tone(ALERT_TONE_HZ, ALERT_TONE_MS);

            motion.clear();
        }

        // 3. Interval-paced poll; drain the whole backlog in one burst.
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

        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    fn handle_message(
        &mut self,
        msg: &InboundMessage,
        bot: &mut impl BotPort,
        hw: &mut impl SignalPort,
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

        match CameraCommand::parse(&msg.text) {
            Some(CameraCommand::ToggleFlash) => {
                self.flash_on = !self.flash_on;
                hw.set_flash(self.flash_on);
            }
            Some(CameraCommand::RequestPhoto) => {
                self.photo_requested = true;
                info!("New photo request");
                bot.send_message(&self.authorized_chat_id, PHOTO_ACK_TEXT, "");
            }
            Some(CameraCommand::ToggleMotionDetection) => {
                self.motion_detection = !self.motion_detection;
                let reply = if self.motion_detection {
                    MOTION_ON_TEXT
                } else {
                    MOTION_OFF_TEXT
                };
                bot.send_message(&self.authorized_chat_id, reply, "");
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

    // ── Queries ───────────────────────────────────────────────

    pub fn flash_on(&self) -> bool {
        self.flash_on
    }

    pub fn motion_detection_enabled(&self) -> bool {
        self.motion_detection
    }

    pub fn photo_requested(&self) -> bool {
        self.photo_requested
    }
}
