//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RemoteSession / CameraService (domain)
//! ```
//!
//! Driven adapters (radio, camera board, media store, clock, event sinks)
//! implement these traits.  The services consume them via generics, so the
//! domain core never touches hardware directly and runs unchanged against
//! the mocks in `tests/integration/mock_hw.rs`.

use heapless::Vec;

use crate::capture::imaging::Frame;
use crate::capture::settings::SettingKey;
use crate::drivers::button::ButtonEvent;
use crate::error::{CaptureError, MountError, TransportError};
use crate::protocol::{MacAddr, SendCounters};

/// Largest datagram the radio carries (ESP-NOW v1 limit).
pub const MAX_PAYLOAD: usize = 250;

// ───────────────────────────────────────────────────────────────
// Radio port (wireless datagram transport)
// ───────────────────────────────────────────────────────────────

/// A datagram as delivered by the radio, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub src: MacAddr,
    pub payload: Vec<u8, MAX_PAYLOAD>,
    /// Received signal strength (dBm).
    pub rssi: i8,
}

/// Connectionless peer-to-peer datagram channel.
///
/// `send` only queues the frame; the radio resolves delivery later and
/// bumps one of the two [`SendCounters`].  Callers read the counters
/// before and after a grace period to learn what happened.
pub trait RadioPort {
    /// Queue `payload` for `peer`.  An `Err` means the radio refused the
    /// frame outright.
    fn send(&mut self, peer: MacAddr, payload: &[u8]) -> Result<(), TransportError>;

    /// Non-blocking read of the next received datagram.
    fn recv(&mut self) -> Option<RawPacket>;

    /// Current delivery counters (monotonic, owned by the transport).
    fn counters(&self) -> SendCounters;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus the blocking delays the control loops use.
pub trait Clock {
    /// Milliseconds since boot.
    fn uptime_ms(&self) -> u64;

    /// Block the (only) control thread for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Whole seconds since boot.
    fn uptime_secs(&self) -> u64 {
        self.uptime_ms() / 1000
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Remote-side ports
// ───────────────────────────────────────────────────────────────

/// Debounced key input on the remote.
pub trait KeyPort {
    /// Return the button whose press edge was seen since the last poll.
    /// At most one button per poll.
    fn poll(&mut self, now_ms: u64) -> Option<super::remote::RemoteButton>;
}

/// Renders the remote's UI state (receipt box, highlight, signal bar).
pub trait RemoteDisplay {
    fn render(&mut self, ui: &super::remote::RemoteUi);
}

// ───────────────────────────────────────────────────────────────
// Camera-side ports
// ───────────────────────────────────────────────────────────────

/// Sensor exposure state captured before a timelapse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExposureSettings {
    pub exposure: u32,
    pub gain: u32,
    pub white_balance: u32,
}

/// Autofocus state reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStatus {
    Idle,
    Focusing,
    Focused,
    Failed,
    Unsupported,
}

/// Image sensor.
pub trait CameraPort {
    /// Frame size produced by [`capture`](Self::capture).
    fn frame_size(&self) -> (u16, u16);

    /// Grab the next frame into `into`.
    fn capture(&mut self, into: &mut Frame);

    /// Run the autofocus routine and return the resulting status.
    fn autofocus(&mut self) -> FocusStatus;

    fn focus_status(&self) -> FocusStatus;

    /// Values the auto-exposure, auto-gain and auto-white-balance loops
    /// have currently settled on.
    fn exposure_settings(&self) -> ExposureSettings;

    /// Disable the auto loops and hold the given values.
    fn pin_exposure(&mut self, settings: &ExposureSettings);

    /// Re-enable the auto loops.
    fn restore_auto_exposure(&mut self);

    /// Apply a settings-registry value (resolution, LED, effect...).
    fn apply_setting(&mut self, key: SettingKey, index: u8);
}

/// Display and beeper on the camera.
pub trait ViewfinderPort {
    fn blit(&mut self, frame: &Frame);
    fn show_message(&mut self, text: &str, colour: u32);
    fn set_mode_label(&mut self, text: &str);
    fn set_status_label(&mut self, text: &str);
    fn set_brightness(&mut self, level: f32);
    /// Highlight the given settings entry (or none).
    fn select_setting(&mut self, key: Option<SettingKey>);
    /// Drop any overlay and return to live preview.
    fn live_preview_mode(&mut self);
    fn refresh(&mut self);
    fn tone(&mut self, freq_hz: u16, duration_ms: u16);
}

/// Storage card insertion / removal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Inserted,
    Removed,
}

/// Local inputs sampled once per camera loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalInputs {
    /// Classified shutter gesture, if one completed this iteration.
    pub shutter: Option<ButtonEvent>,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub select: bool,
    pub ok: bool,
    pub card: Option<CardEvent>,
}

/// Physical controls on the camera.
pub trait ControlsPort {
    /// Debounce all keys and return this iteration's edges.
    fn poll(&mut self, now_ms: u64) -> LocalInputs;

    /// Level of the shutter line right now (true = held).
    fn shutter_held(&mut self) -> bool;
}

/// Everything the capture pipeline needs from the camera board.
pub trait CameraBoard: CameraPort + ViewfinderPort + ControlsPort {}

impl<T: CameraPort + ViewfinderPort + ControlsPort> CameraBoard for T {}

/// An open GIF file accepting frames.
pub trait GifSink {
    fn add_frame(&mut self, frame: &Frame, delay_ms: u32) -> Result<(), CaptureError>;

    /// Close the file and return its size in bytes.
    fn finish(self) -> Result<u64, CaptureError>;
}

/// Removable media store.
pub trait MediaPort {
    type Gif: GifSink;

    fn is_mounted(&self) -> bool;

    fn mount(&mut self) -> Result<(), MountError>;

    fn unmount(&mut self);

    /// Encode and write `frame` as the next JPEG still.
    fn save_jpeg(&mut self, frame: &Frame) -> Result<(), CaptureError>;

    /// Open the next GIF file.
    fn create_gif(&mut self, width: u16, height: u16) -> Result<Self::Gif, CaptureError>;
}
