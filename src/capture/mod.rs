//! Receiver-side capture pipeline.
//!
//! [`machine::CaptureController`] owns the current [`CaptureMode`], the two
//! stop-motion buffers and the [`timelapse::TimelapseScheduler`].  Mode
//! selection happens only through the local settings registry; the remote
//! can fire the shutter but never change modes.

pub mod gif;
pub mod imaging;
pub mod machine;
pub mod settings;
pub mod timelapse;

use serde::{Deserialize, Serialize};

/// Capture modes, in settings-registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CaptureMode {
    /// Single full-resolution still per trigger.
    Jpeg = 0,
    /// Animated GIF burst per trigger.
    Gif = 1,
    /// Dithered live preview; trigger saves the dithered frame.
    GameBoy = 2,
    /// Stop-motion with onion-skin preview.
    Stop = 3,
    /// Interval capture driven by the timelapse scheduler.
    Timelapse = 4,
}

impl CaptureMode {
    /// Total number of modes, used to size the state table.
    pub const COUNT: usize = 5;

    /// Convert an index back to a mode.  Out-of-range indices wrap.
    pub fn from_index(idx: usize) -> Self {
        match idx % Self::COUNT {
            0 => Self::Jpeg,
            1 => Self::Gif,
            2 => Self::GameBoy,
            3 => Self::Stop,
            _ => Self::Timelapse,
        }
    }

    /// Short label shown on the viewfinder.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::GameBoy => "GBOY",
            Self::Stop => "STOP",
            Self::Timelapse => "LAPS",
        }
    }
}

/// The merged shutter trigger consumed by the capture controller.
///
/// Local gestures and decoded remote commands both reduce to this; once
/// built, nothing records where a trigger came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trigger {
    /// Run autofocus (long press or remote `focus`).
    pub focus: bool,
    /// Fire the mode's capture action (short press or remote `snap`).
    pub snap: bool,
}

impl Trigger {
    pub const NONE: Self = Self { focus: false, snap: false };

    /// Logical OR of two sources, applied once.
    pub const fn merge(self, other: Self) -> Self {
        Self {
            focus: self.focus || other.focus,
            snap: self.snap || other.snap,
        }
    }

    pub const fn is_empty(self) -> bool {
        !self.focus && !self.snap
    }
}
