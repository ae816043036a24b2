//! Send-outcome accounting and link-quality scaling.
//!
//! The transport keeps two monotonic counters, `sent_ok` and `sent_fail`,
//! that it bumps asynchronously when the radio resolves a frame.  A send's
//! outcome is never stored; it is derived from the counter delta between a
//! snapshot taken before the send and one taken after the grace period.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Lower bound of the expected RSSI range (dBm).
pub const RSSI_FLOOR_DBM: i32 = -127;
/// Upper bound of the expected RSSI range (dBm).
pub const RSSI_CEIL_DBM: i32 = 0;

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Snapshot of the transport's delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCounters {
    pub sent_ok: u32,
    pub sent_fail: u32,
}

impl SendCounters {
    pub const fn new(sent_ok: u32, sent_fail: u32) -> Self {
        Self { sent_ok, sent_fail }
    }
}

// ---------------------------------------------------------------------------
// Outcome classification
// ---------------------------------------------------------------------------

/// Result of one send attempt, as seen after the grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// `sent_ok` advanced and `sent_fail` did not.
    Delivered,
    /// `sent_fail` advanced, or the send call itself errored.
    Failed,
    /// Neither counter moved within the grace period.
    Pending,
}

impl SendOutcome {
    /// Classify a send from counter snapshots and the send call's result.
    ///
    /// Precedence: failure-counter evidence, then success-counter evidence,
    /// then the transport error, then pending.  A send is never reported as
    /// delivered when `sent_fail` moved.
    pub fn classify(
        before: SendCounters,
        after: SendCounters,
        send_result: Result<(), TransportError>,
    ) -> Self {
        if after.sent_fail > before.sent_fail {
            Self::Failed
        } else if after.sent_ok > before.sent_ok {
            Self::Delivered
        } else if send_result.is_err() {
            Self::Failed
        } else {
            Self::Pending
        }
    }

    pub fn is_delivered(self) -> bool {
        self == Self::Delivered
    }

    pub fn is_failed(self) -> bool {
        self == Self::Failed
    }
}

// ---------------------------------------------------------------------------
// Link quality
// ---------------------------------------------------------------------------

/// Received signal strength rescaled to a 0–100 bar value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkQuality(u8);

impl LinkQuality {
    pub const ZERO: LinkQuality = LinkQuality(0);

    /// Affine map of `[-127, 0]` dBm onto `[0, 100]`, clamped at both ends
    /// and rounded to the nearest integer.
    pub fn from_rssi(rssi_dbm: i32) -> Self {
        let clamped = rssi_dbm.clamp(RSSI_FLOOR_DBM, RSSI_CEIL_DBM);
        let span = RSSI_CEIL_DBM - RSSI_FLOOR_DBM;
        let scaled = ((clamped - RSSI_FLOOR_DBM) * 100 + span / 2) / span;
        Self(scaled as u8)
    }

    pub const fn percent(self) -> u8 {
        self.0
    }
}
