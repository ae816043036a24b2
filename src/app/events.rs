//! Outbound application events.
//!
//! The services emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them, such as log to
//! serial, record them in a test, etc.

use crate::capture::CaptureMode;
use crate::capture::gif::GifReport;
use crate::capture::settings::SettingKey;
use crate::capture::timelapse::TimelapseSubmode;
use crate::error::{CaptureError, MountError, TransportError};
use crate::protocol::{Command, LinkQuality, MacAddr, SendOutcome};

use super::ports::FocusStatus;

/// Which end of the link a service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Remote,
    Camera,
}

/// Mount state of the removable store as tracked by the camera service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStatus {
    Mounted,
    Removed,
    /// All mount attempts failed; held until the next card-detect edge.
    MountFailed(MountError),
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A service has started.
    Started(Node),

    // ── Remote ────────────────────────────────────────────────
    /// A command was sent and classified after the grace period.
    CommandSent { command: Command, outcome: SendOutcome },
    /// A packet arrived and the link bar was updated.
    LinkSample { rssi: i8, quality: LinkQuality },

    // ── Camera: link ──────────────────────────────────────────
    /// A command was decoded and echoed.
    CommandReceived { command: Command, from: MacAddr },
    /// An inbound payload was not a command and was ignored.
    PayloadDropped { len: usize },
    /// The echo back to the sender could not be queued.
    EchoFailed { command: Command, error: TransportError },

    // ── Camera: capture ───────────────────────────────────────
    ModeChanged { from: CaptureMode, to: CaptureMode },
    Focused { before: FocusStatus, after: FocusStatus },
    StillSaved { mode: CaptureMode },
    CaptureFailed { mode: CaptureMode, error: CaptureError },
    GifRecorded(GifReport),
    TimelapseArmed { interval_secs: u32 },
    TimelapseDisarmed,
    TimelapseSubmodeChanged(TimelapseSubmode),

    // ── Camera: housekeeping ──────────────────────────────────
    Storage(StorageStatus),
    SettingSelected(Option<SettingKey>),
    SettingChanged { key: SettingKey, index: u8 },
}
