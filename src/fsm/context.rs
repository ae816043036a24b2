//! Shared mutable context threaded through every mode handler.
//!
//! Handlers never touch hardware.  They write what the capture controller
//! should do (which preview to render, what a trigger means) and the
//! controller applies it against the camera board.

/// How the live preview is rendered this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewPlan {
    /// Sensor frame as-is.
    #[default]
    Plain,
    /// 50/50 blend of the live frame with the last committed frame.
    OnionSkin,
    /// 1-bit dithered frame.
    Dither,
    /// Scheduler-driven; preview may be suppressed in low power.
    Timelapse,
}

/// What a shutter trigger does in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerAction {
    /// Persist the current preview frame as a JPEG.
    #[default]
    Still,
    /// Record an animated GIF burst.
    Burst,
    /// Persist the dithered frame as a single-frame GIF.
    Dithered,
    /// Commit the current frame as the onion-skin reference.
    StopFrame,
    /// Triggers have no effect.
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct ModeContext {
    // --- Outputs (written by handlers) ---
    pub mode_label: &'static str,
    pub preview: PreviewPlan,
    pub trigger: TriggerAction,
    /// Set when the scheduler must be disarmed before the next capture.
    pub disarm_timelapse: bool,

    // --- Stop motion ---
    /// Frames committed since stop-motion was entered.
    pub stop_motion_frames: u32,
}
