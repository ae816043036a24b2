//! Camera service against the mock board, mock media and the loopback
//! radio.

use shutterlink::adapters::loopback::{pair, LoopbackRadio};
use shutterlink::app::camera::CameraService;
use shutterlink::app::events::{AppEvent, StorageStatus};
use shutterlink::app::ports::{CardEvent, Clock, LocalInputs, RadioPort};
use shutterlink::capture::imaging::{pack565, Frame};
use shutterlink::capture::machine::COLOUR_ERROR;
use shutterlink::capture::settings::SettingKey;
use shutterlink::capture::CaptureMode;
use shutterlink::config::TimingConfig;
use shutterlink::drivers::button::ButtonEvent;
use shutterlink::error::{CaptureError, MountError};
use shutterlink::protocol::MacAddr;

use super::mock_hw::{BoardCall, FakeClock, MockBoard, MockMedia, RecordingSink};

const REMOTE: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x01]);
const CAMERA: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x02]);

struct Rig {
    service: CameraService,
    board: MockBoard,
    media: MockMedia,
    radio: LoopbackRadio,
    remote: LoopbackRadio,
    clock: FakeClock,
    sink: RecordingSink,
}

impl Rig {
    fn new(media: MockMedia) -> Self {
        let (remote, radio) = pair(REMOTE, CAMERA);
        let mut board = MockBoard::new();
        let mut sink = RecordingSink::new();
        let mut service = CameraService::new(board.size, TimingConfig::default());
        service.start(&mut board, &media, &mut sink);
        Self {
            service,
            board,
            media,
            radio,
            remote,
            clock: FakeClock::new(),
            sink,
        }
    }

    fn tick(&mut self) {
        self.service.tick(
            &mut self.board,
            &mut self.media,
            &mut self.radio,
            &mut self.clock,
            &mut self.sink,
        );
    }

    fn press(&mut self, inputs: LocalInputs) {
        self.board.queue(inputs);
        self.tick();
    }

    fn shutter(&mut self, event: ButtonEvent) {
        self.press(LocalInputs {
            shutter: Some(event),
            ..LocalInputs::default()
        });
    }

    fn remote_sends(&mut self, payload: &[u8]) {
        self.radio.inject(REMOTE, payload, -50);
        self.tick();
    }

    /// Walk the settings cursor to the mode entry and step the value up.
    fn select_mode(&mut self, mode: CaptureMode) {
        while self.service.settings().selected() != Some(SettingKey::Mode) {
            self.press(LocalInputs {
                right: true,
                ..LocalInputs::default()
            });
        }
        while self.service.controller().mode() != mode {
            self.press(LocalInputs {
                up: true,
                ..LocalInputs::default()
            });
        }
    }

    fn stills_saved(&self) -> usize {
        self.sink.count(|e| matches!(e, AppEvent::StillSaved { .. }))
    }

    fn blitted(&self) -> &Frame {
        self.board.last_blit.as_ref().expect("nothing blitted")
    }

    fn failed_with(&self, mode: CaptureMode, error: CaptureError) -> bool {
        self.sink.events.iter().any(|e| {
            matches!(e, AppEvent::CaptureFailed { mode: m, error: x } if *m == mode && *x == error)
        })
    }
}

// ── Triggers ─────────────────────────────────────────────────

#[test]
fn local_short_press_saves_jpeg() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.media.stills.len(), 1);
    assert!(rig.board.messages().contains(&"Snap!"));
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::LivePreview));
    assert!(rig.board.calls.contains(&BoardCall::Tone(200, 100)));
}

#[test]
fn remote_snap_saves_and_echoes() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.remote_sends(b"snap");

    assert_eq!(rig.media.stills.len(), 1);
    assert_eq!(rig.service.dispatcher().received(), 1);
    let echo = rig.remote.recv().expect("echo");
    assert_eq!(&echo.payload[..], b"snap");
    assert_eq!(echo.src, CAMERA);
}

#[test]
fn ping_is_echoed_without_capturing() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.remote_sends(b"ping");

    assert!(rig.media.stills.is_empty());
    assert_eq!(rig.board.count(|c| *c == BoardCall::Autofocus), 0);
    assert_eq!(rig.remote.recv().map(|p| p.payload.to_vec()), Some(b"ping".to_vec()));
}

#[test]
fn garbage_payload_is_dropped_without_echo() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.remote_sends(b"SNAP");

    assert!(rig.media.stills.is_empty());
    assert_eq!(rig.service.dispatcher().dropped(), 1);
    assert!(rig.remote.recv().is_none());
}

#[test]
fn remote_focus_matches_local_long_press() {
    let mut local = Rig::new(MockMedia::mounted());
    local.shutter(ButtonEvent::LongPress);

    let mut remote = Rig::new(MockMedia::mounted());
    remote.remote_sends(b"focus");

    for rig in [&local, &remote] {
        assert_eq!(rig.board.count(|c| *c == BoardCall::Autofocus), 1);
        assert!(rig.media.stills.is_empty());
        assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Focused { .. })), 1);
    }
}

#[test]
fn simultaneous_local_and_remote_snap_capture_once() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.radio.inject(REMOTE, b"snap", -50);
    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.media.stills.len(), 1);
}

// ── Stop motion ──────────────────────────────────────────────

#[test]
fn stop_motion_frame_counts_and_persists() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::Stop);
    assert_eq!(rig.board.last_mode_label(), Some("STOP"));

    rig.board.scene = 0x07e0;
    rig.remote_sends(b"snap");
    assert_eq!(rig.service.controller().stop_motion_frames(), 1);
    assert_eq!(rig.media.stills.len(), 1);
    assert!(rig.service.controller().last_frame().pixels().iter().all(|&p| p == 0x07e0));

    rig.shutter(ButtonEvent::ShortPress);
    assert_eq!(rig.service.controller().stop_motion_frames(), 2);
}

#[test]
fn stop_motion_without_card_shows_error_then_preview() {
    let mut rig = Rig::new(MockMedia::absent());
    rig.select_mode(CaptureMode::Stop);
    rig.board.clear();
    let before = rig.clock.uptime_ms();

    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.service.controller().stop_motion_frames(), 1);
    assert!(rig
        .board
        .calls
        .contains(&BoardCall::Message("Error\nNo SD Card".into(), COLOUR_ERROR)));
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::LivePreview));
    assert_eq!(rig.clock.uptime_ms() - before, 500);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CaptureFailed {
            mode: CaptureMode::Stop,
            error: CaptureError::StorageUnavailable
        }
    )));
}

#[test]
fn stop_preview_is_plain_before_first_frame() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::Stop);
    rig.board.scene = 0x07e0;

    rig.tick();

    assert_eq!(rig.blitted(), &Frame::filled(16, 12, 0x07e0));
}

#[test]
fn stop_preview_blends_with_last_frame() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::Stop);
    rig.board.scene = 0xffff;
    rig.shutter(ButtonEvent::ShortPress);
    assert_eq!(rig.service.controller().stop_motion_frames(), 1);

    rig.board.scene = 0x0000;
    rig.tick();

    // Half of white per channel: 15/31/15.
    assert_eq!(rig.blitted(), &Frame::filled(16, 12, 0x7bef));
}

#[test]
fn stop_encode_failure_keeps_frame_and_returns_to_preview() {
    let mut rig = Rig::new(MockMedia::broken_codec());
    rig.select_mode(CaptureMode::Stop);
    rig.board.clear();

    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.board.messages(), vec!["Snap!", "Failed"]);
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::LivePreview));
    assert_eq!(rig.service.controller().mode(), CaptureMode::Stop);
    assert_eq!(rig.service.controller().stop_motion_frames(), 1);
    assert!(rig.failed_with(CaptureMode::Stop, CaptureError::Encoding));
}

// ── GIF / GameBoy ────────────────────────────────────────────

#[test]
fn gif_burst_records_minimum_then_while_held() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::Gif);
    rig.board.held_polls = 5;

    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.media.gifs.get(), 1);
    assert_eq!(rig.media.gif_frames.get(), 20);
    assert!(rig.board.calls.contains(&BoardCall::ModeLabel("REC".into())));
    assert_eq!(rig.board.last_mode_label(), Some("GIF"));
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::GifRecorded(report) if report.frames == 20)));
}

#[test]
fn gameboy_snap_writes_single_frame_gif() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::GameBoy);
    rig.tick();

    rig.remote_sends(b"snap");

    assert_eq!(rig.media.gifs.get(), 1);
    assert_eq!(*rig.media.gif_delays.borrow(), vec![1000]);
    assert!(rig.media.stills.is_empty());
}

#[test]
fn gameboy_preview_is_two_level() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::GameBoy);
    rig.board.scene = pack565(128, 128, 128);

    rig.tick();

    let pixels = rig.blitted().pixels();
    assert!(pixels.iter().all(|&p| p == 0x0000 || p == 0xffff));
    assert!(pixels.contains(&0x0000));
    assert!(pixels.contains(&0xffff));
}

#[test]
fn gameboy_encode_failure_shows_failed() {
    let mut rig = Rig::new(MockMedia::broken_codec());
    rig.select_mode(CaptureMode::GameBoy);
    rig.tick();
    rig.board.clear();
    let before = rig.clock.uptime_ms();

    rig.remote_sends(b"snap");

    assert!(rig
        .board
        .calls
        .contains(&BoardCall::Message("Failed".into(), COLOUR_ERROR)));
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::LivePreview));
    assert_eq!(rig.clock.uptime_ms() - before, 500);
    assert_eq!(rig.service.controller().mode(), CaptureMode::GameBoy);
    assert_eq!(rig.media.gif_frames.get(), 0);
    assert!(rig.failed_with(CaptureMode::GameBoy, CaptureError::Encoding));
}

#[test]
fn burst_encode_failure_restores_label_and_preview() {
    let mut rig = Rig::new(MockMedia::broken_codec());
    rig.select_mode(CaptureMode::Gif);
    rig.board.clear();

    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.board.messages(), vec!["Failed"]);
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::LivePreview));
    assert_eq!(rig.board.last_mode_label(), Some("GIF"));
    assert_eq!(rig.service.controller().mode(), CaptureMode::Gif);
    assert!(rig.failed_with(CaptureMode::Gif, CaptureError::Encoding));
}

#[test]
fn burst_without_card_reports_failure() {
    let mut rig = Rig::new(MockMedia::absent());
    rig.select_mode(CaptureMode::Gif);
    rig.shutter(ButtonEvent::ShortPress);

    assert_eq!(rig.media.gifs.get(), 0);
    assert!(rig.board.messages().contains(&"Error\nNo SD Card"));
    assert_eq!(rig.board.last_mode_label(), Some("GIF"));
}

// ── Encoder failures ─────────────────────────────────────────

#[test]
fn jpeg_encode_failure_shows_failed_and_returns_to_preview() {
    let mut rig = Rig::new(MockMedia::broken_codec());
    rig.board.clear();

    rig.shutter(ButtonEvent::ShortPress);

    assert!(rig.media.stills.is_empty());
    assert!(rig
        .board
        .calls
        .contains(&BoardCall::Message("Failed".into(), COLOUR_ERROR)));
    assert_eq!(rig.board.messages(), vec!["Snap!", "Failed"]);
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::LivePreview));
    assert_eq!(rig.service.controller().mode(), CaptureMode::Jpeg);
    assert!(rig.failed_with(CaptureMode::Jpeg, CaptureError::Encoding));
    assert_eq!(rig.stills_saved(), 0);
}

// ── Timelapse ────────────────────────────────────────────────

fn arm_timelapse(rig: &mut Rig) {
    rig.select_mode(CaptureMode::Timelapse);
    rig.press(LocalInputs {
        right: true,
        ..LocalInputs::default()
    });
    assert_eq!(rig.service.settings().selected(), Some(SettingKey::TimelapseRate));
    rig.press(LocalInputs {
        ok: true,
        ..LocalInputs::default()
    });
}

#[test]
fn timelapse_arm_pins_and_leaving_restores_exposure() {
    let mut rig = Rig::new(MockMedia::mounted());
    arm_timelapse(&mut rig);

    assert!(rig.service.controller().timelapse().is_armed());
    assert!(!rig.board.auto_exposure);
    assert!(rig.board.calls.contains(&BoardCall::PinExposure(rig.board.exposure)));

    // Back to the mode entry and step down to STOP.
    rig.press(LocalInputs {
        left: true,
        ..LocalInputs::default()
    });
    rig.press(LocalInputs {
        down: true,
        ..LocalInputs::default()
    });

    assert_eq!(rig.service.controller().mode(), CaptureMode::Stop);
    assert!(!rig.service.controller().timelapse().is_armed());
    assert!(rig.board.auto_exposure);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::TimelapseDisarmed)), 1);
}

#[test]
fn timelapse_captures_are_spaced_by_interval() {
    let mut rig = Rig::new(MockMedia::mounted());
    arm_timelapse(&mut rig);
    let interval = u64::from(rig.service.controller().timelapse().interval_secs());

    let mut capture_times = Vec::new();
    for _ in 0..40 {
        rig.clock.advance(1000);
        let before = rig.stills_saved();
        rig.tick();
        if rig.stills_saved() > before {
            capture_times.push(rig.clock.uptime_ms() / 1000);
        }
    }

    assert!(capture_times.len() >= 3, "captures: {capture_times:?}");
    for pair in capture_times.windows(2) {
        assert!(pair[1] - pair[0] >= interval, "captures: {capture_times:?}");
    }
}

#[test]
fn timelapse_ignores_shutter() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.select_mode(CaptureMode::Timelapse);
    rig.shutter(ButtonEvent::ShortPress);
    rig.remote_sends(b"snap");

    assert!(rig.media.stills.is_empty());
}

#[test]
fn low_power_dims_display_while_armed() {
    let mut rig = Rig::new(MockMedia::mounted());
    arm_timelapse(&mut rig);
    rig.press(LocalInputs {
        select: true,
        ..LocalInputs::default()
    });
    rig.board.clear();
    rig.tick();

    assert!(rig.board.calls.contains(&BoardCall::Brightness(0.05)));
    assert_eq!(rig.board.count(|c| *c == BoardCall::Blit), 0);
}

// ── Settings ─────────────────────────────────────────────────

#[test]
fn hardware_settings_are_forwarded_to_board() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.press(LocalInputs {
        right: true,
        ..LocalInputs::default()
    });
    rig.press(LocalInputs {
        down: true,
        ..LocalInputs::default()
    });

    assert!(rig.board.calls.contains(&BoardCall::ApplySetting(SettingKey::Resolution, 13)));
}

#[test]
fn timelapse_rate_is_hidden_outside_timelapse() {
    let mut rig = Rig::new(MockMedia::mounted());
    for _ in 0..6 {
        rig.press(LocalInputs {
            right: true,
            ..LocalInputs::default()
        });
        assert_ne!(rig.service.settings().selected(), Some(SettingKey::TimelapseRate));
    }
}

// ── Storage ──────────────────────────────────────────────────

#[test]
fn card_insert_mounts_after_retry() {
    let mut media = MockMedia::absent();
    media.failures_before_mount = Some(1);
    let mut rig = Rig::new(media);

    rig.press(LocalInputs {
        card: Some(CardEvent::Inserted),
        ..LocalInputs::default()
    });

    assert_eq!(rig.service.storage(), StorageStatus::Mounted);
    assert_eq!(rig.media.mount_attempts, 2);
    assert!(rig.board.messages().contains(&"Mounting\nSD Card"));
}

#[test]
fn card_insert_gives_up_after_configured_attempts() {
    let mut rig = Rig::new(MockMedia::absent());
    rig.press(LocalInputs {
        card: Some(CardEvent::Inserted),
        ..LocalInputs::default()
    });

    assert_eq!(rig.media.mount_attempts, 3);
    assert_eq!(rig.service.storage(), StorageStatus::MountFailed(MountError::Io));
    assert!(rig.board.messages().contains(&"SD Card\nFailed!"));

    // Still usable afterwards: a snap reports the missing card.
    rig.shutter(ButtonEvent::ShortPress);
    assert!(rig.board.messages().contains(&"Error\nNo SD Card"));
}

#[test]
fn card_removal_unmounts() {
    let mut rig = Rig::new(MockMedia::mounted());
    rig.press(LocalInputs {
        card: Some(CardEvent::Removed),
        ..LocalInputs::default()
    });

    assert!(!rig.media.mounted);
    assert_eq!(rig.service.storage(), StorageStatus::Removed);
}
