//! Integration tests for the sensor hub: sensor report commands, the
//! welcome text, and the blocking flame alert path.

use crate::mock_ports::{BoardCall, CollectingSink, FakeClock, MockBoard, MockBot, msg};

use homeguard::app::commands::WELCOME_TEXT;
use homeguard::app::hub::{FLAME_ALERT_TEXT, HubService};
use homeguard::config::DeviceConfig;
use homeguard::triggers::TriggerFlag;

const AUTHORIZED: &str = "777";

fn make_config() -> DeviceConfig {
    let mut cfg = DeviceConfig::default();
    cfg.authorized_chat_id.push_str(AUTHORIZED).unwrap();
    cfg.bot_token.push_str("12345:TESTTOKEN").unwrap();
    cfg
}

struct Rig {
    service: HubService,
    flame: TriggerFlag,
    bot: MockBot,
    hw: MockBoard,
    clock: FakeClock,
    sink: CollectingSink,
}

impl Rig {
    fn new(batches: Vec<Vec<homeguard::app::ports::InboundMessage>>) -> Self {
        Self {
            service: HubService::new(&make_config()),
            flame: TriggerFlag::new(),
            bot: MockBot::with_batches(batches),
            hw: MockBoard::new(),
            clock: FakeClock::new(),
            sink: CollectingSink::new(),
        }
    }

    fn tick(&mut self) {
        self.service.tick(
            &self.flame,
            &mut self.bot,
            &mut self.hw,
            &self.clock,
            &mut self.sink,
        );
    }

    fn make_poll_due(&self) {
        self.clock.advance(1500);
    }
}

// ── Sensor report commands ────────────────────────────────────

#[test]
fn gas_command_reports_the_raw_reading() {
    let mut rig = Rig::new(vec![vec![msg(1, AUTHORIZED, "/gas")]]);
    rig.hw.gas_raw = 1234;
    rig.make_poll_due();
    rig.tick();

    assert_eq!(
        rig.bot.sent,
        vec![(AUTHORIZED.to_string(), "Gas sensor value: 1234".to_string())]
    );
}

#[test]
fn flame_command_preserves_the_inverted_pin_contract() {
    // HIGH reads as "no flame".
    let mut rig = Rig::new(vec![vec![msg(1, AUTHORIZED, "/flame")]]);
    rig.hw.flame_high = true;
    rig.make_poll_due();
    rig.tick();
    assert_eq!(
        rig.bot.sent_texts(),
        vec!["Flame sensor: No flame in sight!"]
    );

    // LOW reads as "flame detected".
    let mut rig = Rig::new(vec![vec![msg(1, AUTHORIZED, "/flame")]]);
    rig.hw.flame_high = false;
    rig.make_poll_due();
    rig.tick();
    assert_eq!(rig.bot.sent_texts(), vec!["Flame sensor: Flame detected!"]);
}

#[test]
fn start_sends_the_full_welcome_text() {
    let mut rig = Rig::new(vec![vec![msg(1, AUTHORIZED, "/start")]]);
    rig.make_poll_due();
    rig.tick();

    assert_eq!(rig.bot.sent.len(), 1);
    assert_eq!(rig.bot.sent[0].1, WELCOME_TEXT);
}

#[test]
fn unauthorized_sender_is_rejected_without_a_reading() {
    let mut rig = Rig::new(vec![vec![msg(1, "666", "/gas")]]);
    rig.hw.gas_raw = 4095;
    rig.make_poll_due();
    rig.tick();

    assert_eq!(
        rig.bot.sent,
        vec![("666".to_string(), "Unauthorized user".to_string())]
    );
    assert_eq!(rig.sink.count_unauthorized(), 1);
}

#[test]
fn unknown_command_is_silently_ignored() {
    let mut rig = Rig::new(vec![vec![msg(1, AUTHORIZED, "/photo_cam2")]]);
    rig.make_poll_due();
    rig.tick();

    // The camera's vocabulary means nothing to the hub.
    assert!(rig.bot.sent.is_empty());
}

// ── Flame alert path ──────────────────────────────────────────

#[test]
fn flame_trigger_runs_the_alert_sequence_and_clears() {
    let mut rig = Rig::new(vec![]);
    rig.flame.raise();
    rig.tick();

    assert_eq!(rig.bot.sent_texts(), vec![FLAME_ALERT_TEXT]);
    assert_eq!(
        rig.hw.calls,
        vec![
            BoardCall::Indicator(true),
            BoardCall::Tone {
                freq_hz: 1000,
                duration_ms: 1000
            },
            BoardCall::Indicator(false),
        ]
    );
    assert!(!rig.flame.is_raised());

    // Second iteration: nothing pending.
    rig.tick();
    assert_eq!(rig.bot.sent.len(), 1);
}

#[test]
fn alert_path_blocks_the_loop_for_one_second() {
    let mut rig = Rig::new(vec![]);
    rig.flame.raise();
    rig.tick();

    // The hold delay stalls everything — flame re-detection latency is
    // bounded by this one second.
    assert_eq!(*rig.clock.delays.borrow(), vec![1000]);
}

#[test]
fn coalesced_triggers_produce_one_alert() {
    let mut rig = Rig::new(vec![]);
    rig.flame.raise();
    rig.flame.raise();
    rig.tick();
    rig.tick();

    assert_eq!(rig.bot.sent_texts(), vec![FLAME_ALERT_TEXT]);
}
