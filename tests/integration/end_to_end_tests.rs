//! Both nodes on one loopback medium: remote presses travel to the camera
//! service, land on disk and come back as echoes.

use shutterlink::adapters::loopback::{pair, LoopbackRadio};
use shutterlink::adapters::media::DirectoryMediaStore;
use shutterlink::app::camera::CameraService;
use shutterlink::app::events::StorageStatus;
use shutterlink::app::ports::{CardEvent, LocalInputs};
use shutterlink::app::remote::{Receipt, RemoteButton, TransmitterSession};
use shutterlink::capture::CaptureMode;
use shutterlink::config::{LinkConfig, TimingConfig, KEY_PEER_MAC};
use shutterlink::protocol::{Command, MacAddr};

use super::mock_hw::{
    BoardCall, FakeClock, MockBoard, RecordingDisplay, RecordingSink, ScriptedKeys,
};

const REMOTE: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x01]);
const CAMERA: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x02]);

struct Link {
    remote: TransmitterSession,
    remote_radio: LoopbackRadio,
    keys: ScriptedKeys,
    display: RecordingDisplay,
    camera: CameraService,
    camera_radio: LoopbackRadio,
    board: MockBoard,
    media: DirectoryMediaStore,
    clock: FakeClock,
    sink: RecordingSink,
    dir: tempfile::TempDir,
}

impl Link {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let (remote_radio, camera_radio) = pair(REMOTE, CAMERA);

        let config =
            LinkConfig::from_lookup(|key| (key == KEY_PEER_MAC).then(|| CAMERA.to_string()))
                .expect("config");
        let mut display = RecordingDisplay::default();
        let mut sink = RecordingSink::new();
        let mut remote = TransmitterSession::new(config.destination(), TimingConfig::default());
        remote.start(&mut display, &mut sink);

        let mut board = MockBoard::new();
        let media = DirectoryMediaStore::new(dir.path());
        let mut camera = CameraService::new(board.size, TimingConfig::default());
        camera.start(&mut board, &media, &mut sink);

        let mut link = Self {
            remote,
            remote_radio,
            keys: ScriptedKeys::default(),
            display,
            camera,
            camera_radio,
            board,
            media,
            clock: FakeClock::new(),
            sink,
            dir,
        };

        // Card-detect reports the card on the first poll after boot.
        link.board.queue(LocalInputs {
            card: Some(CardEvent::Inserted),
            ..LocalInputs::default()
        });
        link.camera_tick();
        link
    }

    fn remote_tick(&mut self) {
        self.remote.tick(
            &mut self.keys,
            &mut self.remote_radio,
            &mut self.clock,
            &mut self.display,
            &mut self.sink,
        );
    }

    fn camera_tick(&mut self) {
        self.camera.tick(
            &mut self.board,
            &mut self.media,
            &mut self.camera_radio,
            &mut self.clock,
            &mut self.sink,
        );
    }

    fn press(&mut self, button: RemoteButton) {
        self.keys.press(button);
        self.remote_tick();
        self.camera_tick();
        self.remote_tick();
    }

    fn files(&self, ext: &str) -> usize {
        std::fs::read_dir(self.dir.path())
            .expect("read_dir")
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == ext))
            .count()
    }
}

#[test]
fn snap_lands_on_disk_and_echo_lights_link_bar() {
    let mut link = Link::new();
    assert_eq!(link.camera.storage(), StorageStatus::Mounted);

    link.press(RemoteButton::Shutter);

    assert_eq!(link.remote.ui().receipt, Receipt::Ack(Command::Snap));
    assert_eq!(link.remote.ui().link_quality.percent(), 53);
    assert_eq!(link.files("jpg"), 1);
    let first = std::fs::read(link.dir.path().join("img0000.jpg")).expect("jpeg");
    assert_eq!(&first[..2], &[0xff, 0xd8]);
}

#[test]
fn repeated_snaps_take_fresh_names() {
    let mut link = Link::new();
    link.press(RemoteButton::Shutter);
    link.press(RemoteButton::Shutter);
    link.press(RemoteButton::Shutter);

    assert_eq!(link.files("jpg"), 3);
    assert!(link.dir.path().join("img0002.jpg").exists());
}

#[test]
fn remote_focus_runs_autofocus_without_saving() {
    let mut link = Link::new();
    link.press(RemoteButton::Focus);

    assert_eq!(link.board.count(|c| *c == BoardCall::Autofocus), 1);
    assert_eq!(link.files("jpg"), 0);
    assert_eq!(link.remote.ui().receipt, Receipt::Ack(Command::Focus));
}

#[test]
fn gif_mode_snap_writes_gif_file() {
    let mut link = Link::new();
    for inputs in [
        LocalInputs { right: true, ..LocalInputs::default() },
        LocalInputs { right: true, ..LocalInputs::default() },
        LocalInputs { right: true, ..LocalInputs::default() },
        LocalInputs { right: true, ..LocalInputs::default() },
        LocalInputs { up: true, ..LocalInputs::default() },
    ] {
        link.board.queue(inputs);
        link.camera_tick();
    }
    assert_eq!(link.camera.controller().mode(), CaptureMode::Gif);

    link.press(RemoteButton::Shutter);

    assert_eq!(link.files("gif"), 1);
    assert_eq!(link.files("jpg"), 0);
}

#[test]
fn lost_link_fails_on_remote_and_camera_sees_nothing() {
    let mut link = Link::new();
    link.remote_radio.set_delivery(false);
    link.press(RemoteButton::Shutter);

    assert_eq!(link.remote.ui().receipt, Receipt::Fail);
    assert_eq!(link.camera.dispatcher().received(), 0);
    assert_eq!(link.files("jpg"), 0);
}
