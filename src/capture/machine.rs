//! Capture controller: owns the mode machine, the stop-motion buffers and
//! the timelapse scheduler, and turns triggers into capture actions.
//!
//! ```text
//!  Trigger ──▶ ┌──────────────────────────────┐ ──▶ MediaPort
//!              │      CaptureController        │
//!  Clock ────▶ │  ModeMachine · Timelapse      │ ──▶ ViewfinderPort
//!              │  last_frame · onionskin       │
//!              └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Every failure is handled here: an on-screen message, a fixed display
//! delay, then back to live preview.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::{CameraBoard, Clock, EventSink, GifSink, MediaPort, ViewfinderPort};
use crate::config::TimingConfig;
use crate::error::CaptureError;
use crate::fsm::context::{ModeContext, PreviewPlan, TriggerAction};
use crate::fsm::states::build_mode_table;
use crate::fsm::ModeMachine;

use super::gif::record_burst;
use super::imaging::{alpha_blend, dither, Frame};
use super::timelapse::{TimelapsePoll, TimelapseScheduler};
use super::{CaptureMode, Trigger};

pub const COLOUR_INFO: u32 = 0x0000ff;
pub const COLOUR_ERROR: u32 = 0xff0000;
pub const COLOUR_NOTICE: u32 = 0xffffff;

pub const SNAP_TONE_HZ: u16 = 200;
pub const SNAP_TONE_MS: u16 = 100;

/// Frame delay written into single-frame GameBoy GIFs.
const GAMEBOY_FRAME_DELAY_MS: u32 = 1000;

pub struct CaptureController {
    machine: ModeMachine,
    ctx: ModeContext,
    /// Scratch buffer for the live sensor frame.
    live: Frame,
    /// Last committed stop-motion frame, or the dithered GameBoy frame.
    last_frame: Frame,
    /// Blend target for the stop-motion preview.
    onionskin: Frame,
    timelapse: TimelapseScheduler,
    timing: TimingConfig,
}

impl CaptureController {
    /// All buffers are allocated once at the sensor resolution.
    pub fn new(frame_size: (u16, u16), timing: TimingConfig) -> Self {
        let (w, h) = frame_size;
        Self {
            machine: ModeMachine::new(build_mode_table(), CaptureMode::Jpeg),
            ctx: ModeContext::default(),
            live: Frame::new(w, h),
            last_frame: Frame::new(w, h),
            onionskin: Frame::new(w, h),
            timelapse: TimelapseScheduler::new(),
            timing,
        }
    }

    pub fn start(&mut self, board: &mut impl ViewfinderPort) {
        self.machine.start(&mut self.ctx);
        board.set_mode_label(self.ctx.mode_label);
        board.live_preview_mode();
    }

    pub fn mode(&self) -> CaptureMode {
        self.machine.current_mode()
    }

    pub fn stop_motion_frames(&self) -> u32 {
        self.ctx.stop_motion_frames
    }

    pub fn last_frame(&self) -> &Frame {
        &self.last_frame
    }

    pub fn timelapse(&self) -> &TimelapseScheduler {
        &self.timelapse
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    // ── Per-iteration preview ────────────────────────────────

    /// Render this iteration's preview.  In Timelapse mode this also runs
    /// the scheduler, which may capture.
    pub fn preview_tick<B, M, C, S>(
        &mut self,
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
        self.machine.tick(&mut self.ctx);

        match self.ctx.preview {
            PreviewPlan::Plain => {
                board.capture(&mut self.live);
                board.blit(&self.live);
            }
            PreviewPlan::OnionSkin => {
                board.capture(&mut self.live);
                alpha_blend(&mut self.onionskin, &self.last_frame, &self.live);
                board.blit(&self.onionskin);
            }
            PreviewPlan::Dither => {
                board.capture(&mut self.live);
                dither(&mut self.last_frame, &self.live);
                board.blit(&self.last_frame);
            }
            PreviewPlan::Timelapse => self.timelapse_tick(board, media, clock, sink),
        }
    }

    fn timelapse_tick<B, M, C, S>(
        &mut self,
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
        let poll = self.timelapse.poll(clock.uptime_secs());
        board.set_status_label(&self.timelapse.status_label());

        if self.timelapse.preview_visible() {
            board.capture(&mut self.live);
            board.blit(&self.live);
        }
        board.set_brightness(self.timelapse.brightness());
        board.refresh();

        if poll != TimelapsePoll::Due {
            return;
        }

        // Always show what is about to be saved, even in low power.
        board.capture(&mut self.live);
        board.blit(&self.live);
        board.tone(SNAP_TONE_HZ, SNAP_TONE_MS);
        let result = persist_still(board, media, clock, &self.timing, &self.live);
        report_still(sink, CaptureMode::Timelapse, result);

        board.refresh();
        board.capture(&mut self.live);
        board.blit(&self.live);
        self.timelapse.reschedule(clock.uptime_secs());
    }

    // ── Triggers ─────────────────────────────────────────────

    /// Apply the merged trigger.  Focus runs first, then the mode's
    /// capture action.
    pub fn handle_trigger<B, M, C, S>(
        &mut self,
        trigger: Trigger,
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
        if trigger.focus {
            let before = board.focus_status();
            info!("FOCUS {:?}", before);
            let after = board.autofocus();
            info!("autofocus -> {:?}", after);
            sink.emit(&AppEvent::Focused { before, after });
        }

        if !trigger.snap {
            return;
        }

        let mode = self.mode();
        match self.ctx.trigger {
            TriggerAction::Still => {
                board.tone(SNAP_TONE_HZ, SNAP_TONE_MS);
                board.capture(&mut self.live);
                let result = persist_still(board, media, clock, &self.timing, &self.live);
                report_still(sink, mode, result);
            }
            TriggerAction::StopFrame => {
                board.capture(&mut self.last_frame);
                self.ctx.stop_motion_frames += 1;
                debug!("stop-motion frame {}", self.ctx.stop_motion_frames);
                let result = persist_still(board, media, clock, &self.timing, &self.last_frame);
                report_still(sink, mode, result);
            }
            TriggerAction::Dithered => {
                let result = save_single_gif(media, &self.last_frame);
                if let Err(e) = result {
                    show_failure(board, clock, &self.timing, e);
                }
                board.live_preview_mode();
                report_still(sink, mode, result);
            }
            TriggerAction::Burst => {
                board.set_mode_label("REC");
                board.refresh();
                let result = record_burst(board, media, &*clock, &mut self.live, &self.timing);
                board.set_mode_label(self.ctx.mode_label);
                board.refresh();
                match result {
                    Ok(report) => sink.emit(&AppEvent::GifRecorded(report)),
                    Err(error) => {
                        show_failure(board, clock, &self.timing, error);
                        board.live_preview_mode();
                        sink.emit(&AppEvent::CaptureFailed { mode, error });
                    }
                }
            }
            TriggerAction::Ignore => debug!("shutter ignored in {:?}", mode),
        }
    }

    // ── Mode selection & timelapse controls ──────────────────

    /// Switch capture mode.  Leaving Timelapse while armed disarms and
    /// restores auto exposure.  Returns `true` if the mode changed.
    pub fn select_mode<B, S>(&mut self, mode: CaptureMode, board: &mut B, sink: &mut S) -> bool
    where
        B: CameraBoard,
        S: EventSink,
    {
        let from = self.mode();
        if !self.machine.select(mode, &mut self.ctx) {
            return false;
        }
        if self.ctx.disarm_timelapse {
            self.ctx.disarm_timelapse = false;
            if self.timelapse.disarm(board) {
                sink.emit(&AppEvent::TimelapseDisarmed);
            }
            board.set_brightness(1.0);
        }
        board.set_mode_label(self.ctx.mode_label);
        board.live_preview_mode();
        sink.emit(&AppEvent::ModeChanged { from, to: mode });
        true
    }

    /// Arm or disarm the scheduler.  Only effective in Timelapse mode.
    pub fn toggle_timelapse<B, C, S>(&mut self, board: &mut B, clock: &C, sink: &mut S)
    where
        B: CameraBoard,
        C: Clock,
        S: EventSink,
    {
        if self.mode() != CaptureMode::Timelapse {
            return;
        }
        if self.timelapse.is_armed() {
            self.timelapse.disarm(board);
            sink.emit(&AppEvent::TimelapseDisarmed);
        } else {
            self.timelapse.arm(board, clock.uptime_secs());
            sink.emit(&AppEvent::TimelapseArmed {
                interval_secs: self.timelapse.interval_secs(),
            });
        }
    }

    /// Flip HighPower/LowPower.  Only effective in Timelapse mode.
    pub fn toggle_timelapse_submode<B, S>(&mut self, board: &mut B, sink: &mut S)
    where
        B: ViewfinderPort,
        S: EventSink,
    {
        if self.mode() != CaptureMode::Timelapse {
            return;
        }
        let submode = self.timelapse.toggle_submode();
        board.refresh();
        sink.emit(&AppEvent::TimelapseSubmodeChanged(submode));
    }

    pub fn set_timelapse_rate(&mut self, index: u8) {
        self.timelapse.set_rate_index(index);
    }
}

// ───────────────────────────────────────────────────────────────
// Persistence helpers
// ───────────────────────────────────────────────────────────────

/// The still-image persistence path: "Snap!", write, and on failure show
/// the error for the configured delay.  Always ends in live preview.
fn persist_still<B, M, C>(
    board: &mut B,
    media: &mut M,
    clock: &mut C,
    timing: &TimingConfig,
    frame: &Frame,
) -> Result<(), CaptureError>
where
    B: ViewfinderPort,
    M: MediaPort,
    C: Clock,
{
    board.show_message("Snap!", COLOUR_INFO);
    let result = if media.is_mounted() {
        media.save_jpeg(frame)
    } else {
        Err(CaptureError::StorageUnavailable)
    };
    if let Err(e) = result {
        show_failure(board, clock, timing, e);
    }
    board.live_preview_mode();
    result
}

fn save_single_gif<M: MediaPort>(media: &mut M, frame: &Frame) -> Result<(), CaptureError> {
    if !media.is_mounted() {
        return Err(CaptureError::StorageUnavailable);
    }
    let mut gif = media.create_gif(frame.width(), frame.height())?;
    gif.add_frame(frame, GAMEBOY_FRAME_DELAY_MS)?;
    gif.finish()?;
    Ok(())
}

fn show_failure<B, C>(board: &mut B, clock: &mut C, timing: &TimingConfig, error: CaptureError)
where
    B: ViewfinderPort,
    C: Clock,
{
    board.show_message(error.message(), COLOUR_ERROR);
    clock.delay_ms(timing.error_display_ms);
}

fn report_still<S: EventSink>(sink: &mut S, mode: CaptureMode, result: Result<(), CaptureError>) {
    match result {
        Ok(()) => sink.emit(&AppEvent::StillSaved { mode }),
        Err(error) => sink.emit(&AppEvent::CaptureFailed { mode, error }),
    }
}
