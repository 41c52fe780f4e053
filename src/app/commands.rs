//! Command vocabulary.
//!
//! Inbound text is matched exactly against a fixed set of slash commands.
//! Anything else is silently ignored — no reply, no error. The `_cam2`
//! suffix distinguishes this camera from its sibling on the same bot;
//! the welcome text lists both nodes' commands because the command set is
//! a shared contract across the installation.

/// Commands understood by the camera node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    /// `/flash_cam2` — toggle the flash LED.
    ToggleFlash,
    /// `/photo_cam2` — capture and send a photo on the next loop iteration.
    RequestPhoto,
    /// `/toggle_motion_detection_cam2` — enable/disable the motion alert path.
    ToggleMotionDetection,
}

impl CameraCommand {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "/flash_cam2" => Some(Self::ToggleFlash),
            "/photo_cam2" => Some(Self::RequestPhoto),
            "/toggle_motion_detection_cam2" => Some(Self::ToggleMotionDetection),
            _ => None,
        }
    }
}

/// Commands understood by the sensor hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubCommand {
    /// `/gas` — report the raw gas-sensor ADC value.
    ReadGas,
    /// `/flame` — report the flame-sensor state.
    ReadFlame,
    /// `/start` — send the welcome/help text.
    Help,
}

impl HubCommand {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "/gas" => Some(Self::ReadGas),
            "/flame" => Some(Self::ReadFlame),
            "/start" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Reply sent to any requester whose chat id is not the authorised one.
pub const UNAUTHORIZED_REPLY: &str = "Unauthorized user";

/// `/start` help text, covering the whole installation's command set.
pub const WELCOME_TEXT: &str = "\
Welcome to the Home Security Telegram bot.
/photo_cam1 : takes a new photo on Camera #1
/photo_cam2 : takes a new photo on Camera #2
/flash_cam1 : toggle flash LED on Camera #1
/flash_cam2 : toggle flash LED on Camera #2
/toggle_motion_detection_cam1 : toggle motion detection on Camera #1
/toggle_motion_detection_cam2 : toggle motion detection on Camera #2
/gas : request gas sensor reading
/flame : request flame sensor reading

An alert will be sent if a fire is detected.
If motion detection is activated you will receive a photo whenever motion is detected.
";
