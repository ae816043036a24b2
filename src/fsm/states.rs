//! Concrete mode handlers and table builder.
//!
//! ```text
//!  JPEG ◀──▶ GIF ◀──▶ GBOY ◀──▶ STOP ◀──▶ LAPS
//!    ▲                                      │
//!    └──────────────────────────────────────┘
//!         (selection only, wraps both ways)
//!
//!  LAPS ──[exit]──▶ disarm scheduler, restore auto exposure
//! ```

use super::context::{ModeContext, PreviewPlan, TriggerAction};
use super::ModeDescriptor;
use crate::capture::CaptureMode;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; CaptureMode::COUNT] {
    [
        ModeDescriptor {
            id: CaptureMode::Jpeg,
            name: "Jpeg",
            on_enter: Some(jpeg_enter),
            on_exit: None,
            on_update: plain_update,
        },
        ModeDescriptor {
            id: CaptureMode::Gif,
            name: "Gif",
            on_enter: Some(gif_enter),
            on_exit: None,
            on_update: plain_update,
        },
        ModeDescriptor {
            id: CaptureMode::GameBoy,
            name: "GameBoy",
            on_enter: Some(gameboy_enter),
            on_exit: None,
            on_update: gameboy_update,
        },
        ModeDescriptor {
            id: CaptureMode::Stop,
            name: "Stop",
            on_enter: Some(stop_enter),
            on_exit: None,
            on_update: stop_update,
        },
        ModeDescriptor {
            id: CaptureMode::Timelapse,
            name: "Timelapse",
            on_enter: Some(timelapse_enter),
            on_exit: Some(timelapse_exit),
            on_update: timelapse_update,
        },
    ]
}

fn enter_common(ctx: &mut ModeContext, mode: CaptureMode, trigger: TriggerAction) {
    ctx.mode_label = mode.label();
    ctx.trigger = trigger;
    ctx.preview = PreviewPlan::Plain;
}

fn plain_update(ctx: &mut ModeContext) {
    ctx.preview = PreviewPlan::Plain;
}

// ═══════════════════════════════════════════════════════════════════════════
//  JPEG / GIF
// ═══════════════════════════════════════════════════════════════════════════

fn jpeg_enter(ctx: &mut ModeContext) {
    enter_common(ctx, CaptureMode::Jpeg, TriggerAction::Still);
}

fn gif_enter(ctx: &mut ModeContext) {
    enter_common(ctx, CaptureMode::Gif, TriggerAction::Burst);
}

// ═══════════════════════════════════════════════════════════════════════════
//  GAMEBOY: dithered preview
// ═══════════════════════════════════════════════════════════════════════════

fn gameboy_enter(ctx: &mut ModeContext) {
    enter_common(ctx, CaptureMode::GameBoy, TriggerAction::Dithered);
    ctx.preview = PreviewPlan::Dither;
}

fn gameboy_update(ctx: &mut ModeContext) {
    ctx.preview = PreviewPlan::Dither;
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOP: onion skin over the last committed frame
// ═══════════════════════════════════════════════════════════════════════════

fn stop_enter(ctx: &mut ModeContext) {
    enter_common(ctx, CaptureMode::Stop, TriggerAction::StopFrame);
    ctx.stop_motion_frames = 0;
}

fn stop_update(ctx: &mut ModeContext) {
    // Nothing to blend against until the first frame is committed.
    ctx.preview = if ctx.stop_motion_frames > 0 {
        PreviewPlan::OnionSkin
    } else {
        PreviewPlan::Plain
    };
}

// ═══════════════════════════════════════════════════════════════════════════
//  TIMELAPSE: scheduler owns capture; shutter does nothing
// ═══════════════════════════════════════════════════════════════════════════

fn timelapse_enter(ctx: &mut ModeContext) {
    enter_common(ctx, CaptureMode::Timelapse, TriggerAction::Ignore);
    ctx.preview = PreviewPlan::Timelapse;
    ctx.disarm_timelapse = false;
}

fn timelapse_exit(ctx: &mut ModeContext) {
    info!("leaving timelapse, disarming scheduler");
    ctx.disarm_timelapse = true;
}

fn timelapse_update(ctx: &mut ModeContext) {
    ctx.preview = PreviewPlan::Timelapse;
}
