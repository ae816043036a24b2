//! Timelapse scheduler.
//!
//! ```text
//!            arm: snapshot + pin exposure
//!   DISARMED ───────────────────────────▶ ARMED ──┐ remaining <= 0:
//!      ▲                                   │  ▲   │ capture, reschedule
//!      └──── disarm: restore auto ─────────┘  └───┘
//! ```
//!
//! `remaining` and `next_capture_at` are either both set (armed) or both
//! `None` (disarmed).  Exposure is pinned exactly while armed.  Times are
//! whole seconds of uptime.

use core::fmt::Write;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::CameraPort;

/// Selectable capture intervals (seconds).
pub const TIMELAPSE_RATES: [u32; 14] = [
    5, 10, 20, 30, 60, 90, 120, 180, 240, 300, 600, 900, 1800, 3600,
];

/// Display brightness while armed in low power.
pub const LOW_POWER_BRIGHTNESS: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimelapseSubmode {
    /// Live preview between captures.
    #[default]
    HighPower,
    /// Preview suppressed and display dimmed between captures.
    LowPower,
}

impl TimelapseSubmode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::HighPower => Self::LowPower,
            Self::LowPower => Self::HighPower,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighPower => "HiPwr",
            Self::LowPower => "LowPwr",
        }
    }
}

/// What one scheduler poll found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelapsePoll {
    Disarmed,
    /// Armed, seconds left until the next capture.
    Waiting(i64),
    /// Armed and the capture time has been reached.
    Due,
}

#[derive(Debug, Clone, Default)]
pub struct TimelapseScheduler {
    remaining: Option<i64>,
    next_capture_at: Option<u64>,
    submode: TimelapseSubmode,
    rate_index: u8,
}

impl TimelapseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<i64> {
        self.remaining
    }

    pub fn next_capture_at(&self) -> Option<u64> {
        self.next_capture_at
    }

    pub fn submode(&self) -> TimelapseSubmode {
        self.submode
    }

    pub fn toggle_submode(&mut self) -> TimelapseSubmode {
        self.submode = self.submode.toggled();
        self.submode
    }

    pub fn rate_index(&self) -> u8 {
        self.rate_index
    }

    /// Select an entry of [`TIMELAPSE_RATES`] (wraps).  A running schedule
    /// keeps its current deadline and picks up the new interval after the
    /// next capture.
    pub fn set_rate_index(&mut self, index: u8) {
        self.rate_index = index % TIMELAPSE_RATES.len() as u8;
    }

    pub fn interval_secs(&self) -> u32 {
        TIMELAPSE_RATES[self.rate_index as usize]
    }

    /// Snapshot the sensor's current auto settings, pin them, and start the
    /// countdown.  No-op while armed.
    pub fn arm(&mut self, camera: &mut impl CameraPort, now_secs: u64) {
        if self.is_armed() {
            return;
        }
        let saved = camera.exposure_settings();
        camera.pin_exposure(&saved);

        let interval = self.interval_secs();
        self.remaining = Some(i64::from(interval));
        self.next_capture_at = Some(now_secs + u64::from(interval) + 1);
        info!("timelapse armed: every {interval}s, exposure {saved:?}");
    }

    /// Stop the countdown and hand exposure back to the sensor's auto
    /// loops.  Returns `false` if already disarmed.
    pub fn disarm(&mut self, camera: &mut impl CameraPort) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.remaining = None;
        self.next_capture_at = None;
        camera.restore_auto_exposure();
        info!("timelapse disarmed");
        true
    }

    /// Recompute the countdown.
    pub fn poll(&mut self, now_secs: u64) -> TimelapsePoll {
        let Some(next) = self.next_capture_at else {
            return TimelapsePoll::Disarmed;
        };
        let remaining = next as i64 - now_secs as i64;
        self.remaining = Some(remaining);
        if remaining <= 0 {
            TimelapsePoll::Due
        } else {
            TimelapsePoll::Waiting(remaining)
        }
    }

    /// Schedule the next capture after one has run.
    pub fn reschedule(&mut self, now_secs: u64) {
        if self.is_armed() {
            let interval = self.interval_secs();
            self.next_capture_at = Some(now_secs + u64::from(interval) + 1);
            self.remaining = Some(i64::from(interval) + 1);
        }
    }

    /// `STOP` when disarmed, otherwise the countdown (never negative).
    pub fn status_label(&self) -> heapless::String<16> {
        let mut label = heapless::String::new();
        match self.remaining {
            None => {
                let _ = label.push_str("STOP");
            }
            Some(r) => {
                let _ = write!(label, "{}s", r.max(0));
            }
        }
        label
    }

    /// Whether live preview runs between captures.
    pub fn preview_visible(&self) -> bool {
        !self.is_armed() || self.submode == TimelapseSubmode::HighPower
    }

    pub fn brightness(&self) -> f32 {
        if self.is_armed() && self.submode == TimelapseSubmode::LowPower {
            LOW_POWER_BRIGHTNESS
        } else {
            1.0
        }
    }
}
