//! Camera service: the receiver's control loop.
//!
//! ```text
//!  ControlsPort ──┐                          ┌──▶ ViewfinderPort
//!                 ├─▶ Trigger ─▶ Capture ────┤
//!  RadioPort ─────┘   (merge)   Controller   └──▶ MediaPort
//!  (Dispatcher)
//! ```
//!
//! Per iteration: preview, local inputs, one remote packet, merged trigger,
//! card detect, then settings navigation.  Local input is always sampled
//! before the radio is polled.

use log::{info, warn};

use crate::capture::machine::{CaptureController, COLOUR_ERROR, COLOUR_NOTICE};
use crate::capture::settings::{SettingKey, Settings};
use crate::capture::CaptureMode;
use crate::config::TimingConfig;
use crate::error::MountError;

use super::dispatcher::{local_trigger, remote_trigger, ReceiverDispatcher};
use super::events::{AppEvent, Node, StorageStatus};
use super::ports::{CameraBoard, CardEvent, Clock, EventSink, LocalInputs, MediaPort, RadioPort};

pub struct CameraService {
    controller: CaptureController,
    dispatcher: ReceiverDispatcher,
    settings: Settings,
    storage: StorageStatus,
}

impl CameraService {
    pub fn new(frame_size: (u16, u16), timing: TimingConfig) -> Self {
        Self {
            controller: CaptureController::new(frame_size, timing),
            dispatcher: ReceiverDispatcher::new(),
            settings: Settings::new(),
            storage: StorageStatus::Removed,
        }
    }

    pub fn start<B, M, S>(&mut self, board: &mut B, media: &M, sink: &mut S)
    where
        B: CameraBoard,
        M: MediaPort,
        S: EventSink,
    {
        self.controller.start(board);
        board.select_setting(None);
        self.storage = if media.is_mounted() {
            StorageStatus::Mounted
        } else {
            StorageStatus::Removed
        };
        sink.emit(&AppEvent::Started(Node::Camera));
        sink.emit(&AppEvent::Storage(self.storage));
    }

    pub fn controller(&self) -> &CaptureController {
        &self.controller
    }

    pub fn dispatcher(&self) -> &ReceiverDispatcher {
        &self.dispatcher
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> StorageStatus {
        self.storage
    }

    /// Run one control-loop iteration.
    pub fn tick<B, M, R, C, S>(
        &mut self,
        board: &mut B,
        media: &mut M,
        radio: &mut R,
        clock: &mut C,
        sink: &mut S,
    ) where
        B: CameraBoard,
        M: MediaPort,
        R: RadioPort,
        C: Clock,
        S: EventSink,
    {
        self.controller.preview_tick(board, media, clock, sink);

        let inputs = board.poll(clock.uptime_ms());
        let remote = self.dispatcher.poll(radio, sink);

        let trigger = local_trigger(inputs.shutter).merge(remote_trigger(remote));
        if !trigger.is_empty() {
            self.controller.handle_trigger(trigger, board, media, clock, sink);
        }

        if let Some(card) = inputs.card {
            self.handle_card(card, board, media, clock, sink);
        }

        self.handle_navigation(&inputs, board, clock, sink);
    }

    // ── Storage ──────────────────────────────────────────────

    fn handle_card<B, M, C, S>(
        &mut self,
        card: CardEvent,
        board: &mut B,
        media: &mut M,
        clock: &mut C,
        sink: &mut S,
    ) where
        B: CameraBoard,
        M: MediaPort,
        C: Clock,
        S: EventSink,
    {
        match card {
            CardEvent::Removed => {
                info!("SD card removed");
                media.unmount();
                self.storage = StorageStatus::Removed;
            }
            CardEvent::Inserted => {
                info!("SD card inserted");
                board.show_message("Mounting\nSD Card", COLOUR_NOTICE);
                self.storage = match mount_with_retry(media, clock, self.controller.timing()) {
                    Ok(()) => {
                        board.live_preview_mode();
                        StorageStatus::Mounted
                    }
                    Err(e) => {
                        board.show_message("SD Card\nFailed!", COLOUR_ERROR);
                        clock.delay_ms(self.controller.timing().error_display_ms);
                        StorageStatus::MountFailed(e)
                    }
                };
            }
        }
        board.refresh();
        sink.emit(&AppEvent::Storage(self.storage));
    }

    // ── Settings navigation ──────────────────────────────────

    fn handle_navigation<B, C, S>(
        &mut self,
        inputs: &LocalInputs,
        board: &mut B,
        clock: &C,
        sink: &mut S,
    ) where
        B: CameraBoard,
        C: Clock,
        S: EventSink,
    {
        if inputs.up {
            if let Some((key, index)) = self.settings.adjust(1) {
                self.apply_setting(key, index, board, sink);
            }
        }
        if inputs.down {
            if let Some((key, index)) = self.settings.adjust(-1) {
                self.apply_setting(key, index, board, sink);
            }
        }

        let in_timelapse = self.controller.mode() == CaptureMode::Timelapse;
        if inputs.right {
            let key = self.settings.next(in_timelapse);
            board.select_setting(key);
            sink.emit(&AppEvent::SettingSelected(key));
        }
        if inputs.left {
            let key = self.settings.prev(in_timelapse);
            board.select_setting(key);
            sink.emit(&AppEvent::SettingSelected(key));
        }

        let on_rate = self.settings.selected() == Some(SettingKey::TimelapseRate);
        if inputs.select && on_rate {
            self.controller.toggle_timelapse_submode(board, sink);
        }
        if inputs.ok && on_rate {
            self.controller.toggle_timelapse(board, clock, sink);
        }
    }

    fn apply_setting<B, S>(&mut self, key: SettingKey, index: u8, board: &mut B, sink: &mut S)
    where
        B: CameraBoard,
        S: EventSink,
    {
        info!("setting {} -> {index}", key.name());
        match key {
            SettingKey::Mode => {
                let mode = CaptureMode::from_index(index as usize);
                self.controller.select_mode(mode, board, sink);
            }
            SettingKey::TimelapseRate => self.controller.set_timelapse_rate(index),
            _ => board.apply_setting(key, index),
        }
        sink.emit(&AppEvent::SettingChanged { key, index });
    }
}

/// Try to mount the store up to the configured number of times.
fn mount_with_retry<M: MediaPort, C: Clock>(
    media: &mut M,
    clock: &mut C,
    timing: &TimingConfig,
) -> Result<(), MountError> {
    let mut last = MountError::NoCard;
    for attempt in 1..=timing.mount_attempts {
        match media.mount() {
            Ok(()) => {
                info!("mounted on attempt {attempt}");
                return Ok(());
            }
            Err(e) => {
                warn!("mount attempt {attempt} failed: {e}");
                last = e;
                clock.delay_ms(timing.mount_retry_delay_ms);
            }
        }
    }
    Err(last)
}
