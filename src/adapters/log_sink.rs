//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on hardware, stderr on the host).  One line
//! per event, prefixed with a fixed tag so the output greps well.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, StorageStatus};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(node) => info!("START | node={:?}", node),

            AppEvent::CommandSent { command, outcome } => {
                info!("SEND | cmd={} | outcome={:?}", command, outcome);
            }
            AppEvent::LinkSample { rssi, quality } => {
                debug!("LINK | rssi={}dBm | quality={}%", rssi, quality.percent());
            }

            AppEvent::CommandReceived { command, from } => {
                info!("RECV | cmd={} | from={}", command, from);
            }
            AppEvent::PayloadDropped { len } => debug!("RECV | dropped {} byte payload", len),
            AppEvent::EchoFailed { command, error } => {
                warn!("RECV | echo of {} failed: {}", command, error);
            }

            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.label(), to.label());
            }
            AppEvent::Focused { before, after } => {
                info!("FOCUS | {:?} -> {:?}", before, after);
            }
            AppEvent::StillSaved { mode } => info!("CAPTURE | {} still saved", mode.label()),
            AppEvent::CaptureFailed { mode, error } => {
                warn!("CAPTURE | {} failed: {}", mode.label(), error);
            }
            AppEvent::GifRecorded(report) => match serde_json::to_string(report) {
                Ok(json) => info!("CAPTURE | gif {}", json),
                Err(e) => warn!("CAPTURE | gif report not serialisable: {}", e),
            },

            AppEvent::TimelapseArmed { interval_secs } => {
                info!("LAPS | armed, every {}s", interval_secs);
            }
            AppEvent::TimelapseDisarmed => info!("LAPS | disarmed"),
            AppEvent::TimelapseSubmodeChanged(submode) => {
                info!("LAPS | submode={}", submode.label());
            }

            AppEvent::Storage(status) => match status {
                StorageStatus::Mounted => info!("SD | mounted"),
                StorageStatus::Removed => info!("SD | removed"),
                StorageStatus::MountFailed(e) => warn!("SD | mount failed: {}", e),
            },
            AppEvent::SettingSelected(key) => {
                debug!("SETTING | selected={}", key.map_or("none", |k| k.name()));
            }
            AppEvent::SettingChanged { key, index } => {
                info!("SETTING | {}={}", key.name(), index);
            }
        }
    }
}
