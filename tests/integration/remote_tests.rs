//! Transmitter session against the loopback radio.

use shutterlink::adapters::loopback::{pair, LoopbackRadio};
use shutterlink::app::dispatcher::ReceiverDispatcher;
use shutterlink::app::events::AppEvent;
use shutterlink::app::remote::{Receipt, RemoteButton, TransmitterSession};
use shutterlink::config::TimingConfig;
use shutterlink::protocol::{Command, LinkQuality, MacAddr, SendOutcome};

use super::mock_hw::{FakeClock, RecordingDisplay, RecordingSink, ScriptedKeys};

const REMOTE: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x01]);
const CAMERA: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x02]);

struct Rig {
    session: TransmitterSession,
    radio: LoopbackRadio,
    camera: LoopbackRadio,
    keys: ScriptedKeys,
    clock: FakeClock,
    display: RecordingDisplay,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let (radio, camera) = pair(REMOTE, CAMERA);
        let mut rig = Self {
            session: TransmitterSession::new(CAMERA, TimingConfig::default()),
            radio,
            camera,
            keys: ScriptedKeys::default(),
            clock: FakeClock::new(),
            display: RecordingDisplay::default(),
            sink: RecordingSink::new(),
        };
        rig.session.start(&mut rig.display, &mut rig.sink);
        rig
    }

    fn tick(&mut self) {
        self.session.tick(
            &mut self.keys,
            &mut self.radio,
            &mut self.clock,
            &mut self.display,
            &mut self.sink,
        );
    }

    fn tick_at(&mut self, ms: u64) {
        self.clock.set(ms);
        self.tick();
    }
}

#[test]
fn delivered_snap_shows_ack_then_clears() {
    let mut rig = Rig::new();
    rig.keys.press(RemoteButton::Shutter);
    rig.tick();

    assert_eq!(rig.session.ui().receipt, Receipt::Ack(Command::Snap));
    assert_eq!(rig.session.ui().highlighted, Some(RemoteButton::Shutter));
    assert_eq!(rig.camera.pending_rx(), 1, "snap must reach the camera");

    // Grace period (50) + ack display (750).
    rig.tick_at(799);
    assert_eq!(rig.session.ui().receipt, Receipt::Ack(Command::Snap));
    rig.tick_at(800);
    assert_eq!(rig.session.ui().receipt, Receipt::Hidden);
    assert_eq!(rig.session.ui().highlighted, None);
    assert_eq!(rig.display.frames.last().map(|ui| ui.receipt), Some(Receipt::Hidden));
}

#[test]
fn failed_send_shows_fail_and_zeroes_link() {
    let mut rig = Rig::new();
    rig.radio.inject(CAMERA, b"ping", -60);
    rig.tick();
    assert_eq!(rig.session.ui().link_quality.percent(), 53);

    rig.radio.set_delivery(false);
    rig.keys.press(RemoteButton::Focus);
    rig.tick();
    assert_eq!(rig.session.ui().receipt, Receipt::Fail);
    assert_eq!(rig.session.ui().link_quality, LinkQuality::ZERO);

    rig.tick_at(2049);
    assert_eq!(rig.session.ui().receipt, Receipt::Fail);
    rig.tick_at(2050);
    assert_eq!(rig.session.ui().receipt, Receipt::Hidden);
}

#[test]
fn ping_echo_updates_link_bar() {
    let mut rig = Rig::new();
    rig.keys.press(RemoteButton::Ping);
    rig.tick();
    assert_eq!(rig.session.ui().receipt, Receipt::Ack(Command::Ping));

    // The camera's dispatcher echoes the payload back over the same medium.
    let mut dispatcher = ReceiverDispatcher::new();
    let mut camera_sink = RecordingSink::new();
    assert_eq!(dispatcher.poll(&mut rig.camera, &mut camera_sink), Some(Command::Ping));
    rig.tick();
    assert_eq!(rig.session.ui().link_quality.percent(), 53);
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::LinkSample { rssi: -60, .. })));
}

#[test]
fn undecodable_packet_still_refreshes_link_bar() {
    let mut rig = Rig::new();
    rig.radio.inject(CAMERA, &[0xde, 0xad], -20);
    rig.tick();
    assert_eq!(rig.session.ui().link_quality, LinkQuality::from_rssi(-20));
    assert_eq!(rig.session.ui().receipt, Receipt::Hidden);
}

#[test]
fn late_delivery_report_is_pending_and_leaves_receipt() {
    let mut rig = Rig::new();
    rig.radio.set_deferred_ack(true);
    rig.keys.press(RemoteButton::Shutter);
    rig.tick();

    assert_eq!(rig.session.ui().receipt, Receipt::Hidden);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CommandSent {
            command: Command::Snap,
            outcome: SendOutcome::Pending
        }
    )));

    // The report lands after the grace period; the next press only sees
    // its own delta.
    rig.radio.flush_acks();
    rig.radio.set_deferred_ack(false);
    rig.keys.press(RemoteButton::Ping);
    rig.tick();
    assert_eq!(rig.session.ui().receipt, Receipt::Ack(Command::Ping));
}

#[test]
fn unknown_peer_is_a_failure() {
    let (mut radio, _camera) = pair(REMOTE, CAMERA);
    let stranger = MacAddr([0x02, 0, 0, 0, 0, 0x09]);
    let mut session = TransmitterSession::new(stranger, TimingConfig::default());
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let outcome = session.press(RemoteButton::Shutter, &mut radio, &mut clock, &mut sink);
    assert_eq!(outcome, SendOutcome::Failed);
    assert_eq!(session.ui().receipt, Receipt::Fail);
}

#[test]
fn new_press_restarts_receipt_timer() {
    let mut rig = Rig::new();
    rig.keys.press(RemoteButton::Shutter);
    rig.tick(); // now 50, clears at 800

    rig.clock.set(700);
    rig.keys.press(RemoteButton::Ping);
    rig.tick(); // now 750, clears at 1500

    rig.tick_at(1000);
    assert_eq!(rig.session.ui().receipt, Receipt::Ack(Command::Ping));
    rig.tick_at(1500);
    assert_eq!(rig.session.ui().receipt, Receipt::Hidden);
}

#[test]
fn display_redraws_only_on_change() {
    let mut rig = Rig::new();
    let initial = rig.display.frames.len();
    rig.tick_at(10);
    rig.tick_at(20);
    assert_eq!(rig.display.frames.len(), initial);
}
