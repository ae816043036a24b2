//! Log-backed display adapters.
//!
//! Widget layout and pixel pushing are outside this crate; these adapters
//! render UI state as log lines so both nodes run (and can be watched over
//! the serial console) without a display driver.

use log::{debug, info};

use crate::app::ports::{RemoteDisplay, ViewfinderPort};
use crate::app::remote::RemoteUi;
use crate::capture::imaging::Frame;
use crate::capture::settings::SettingKey;

/// Remote UI as one log line per change.
#[derive(Debug, Default)]
pub struct LogRemoteDisplay {
    last: Option<RemoteUi>,
}

impl LogRemoteDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered state.
    pub fn last(&self) -> Option<&RemoteUi> {
        self.last.as_ref()
    }
}

impl RemoteDisplay for LogRemoteDisplay {
    fn render(&mut self, ui: &RemoteUi) {
        if self.last.as_ref() == Some(ui) {
            return;
        }
        let bars = usize::from(ui.link_quality.percent() / 20);
        info!(
            "UI | [{:<5}] {:<5} | link {:>3}% {}",
            ui.highlighted.map_or("", |b| b.command().label()),
            ui.receipt.text(),
            ui.link_quality.percent(),
            "#".repeat(bars),
        );
        self.last = Some(*ui);
    }
}

/// Viewfinder that logs overlays and counts blits.
#[derive(Debug)]
pub struct LogViewfinder {
    blits: u64,
    brightness: f32,
    mode_label: String,
    status_label: String,
}

impl Default for LogViewfinder {
    fn default() -> Self {
        Self {
            blits: 0,
            brightness: 1.0,
            mode_label: String::new(),
            status_label: String::new(),
        }
    }
}

impl LogViewfinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blits(&self) -> u64 {
        self.blits
    }
}

impl ViewfinderPort for LogViewfinder {
    fn blit(&mut self, frame: &Frame) {
        self.blits += 1;
        debug!("blit {}x{} #{}", frame.width(), frame.height(), self.blits);
    }

    fn show_message(&mut self, text: &str, colour: u32) {
        info!("VF | message {:?} (#{colour:06x})", text);
    }

    fn set_mode_label(&mut self, text: &str) {
        if self.mode_label != text {
            text.clone_into(&mut self.mode_label);
            info!("VF | mode {}", text);
        }
    }

    fn set_status_label(&mut self, text: &str) {
        if self.status_label != text {
            text.clone_into(&mut self.status_label);
            debug!("VF | status {}", text);
        }
    }

    fn set_brightness(&mut self, level: f32) {
        if (self.brightness - level).abs() > f32::EPSILON {
            self.brightness = level;
            info!("VF | brightness {:.2}", level);
        }
    }

    fn select_setting(&mut self, key: Option<SettingKey>) {
        info!("VF | setting {}", key.map_or("none", |k| k.name()));
    }

    fn live_preview_mode(&mut self) {
        debug!("VF | live preview");
    }

    fn refresh(&mut self) {}

    fn tone(&mut self, freq_hz: u16, duration_ms: u16) {
        debug!("VF | tone {freq_hz}Hz {duration_ms}ms");
    }
}
