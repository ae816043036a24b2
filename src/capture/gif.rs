//! Animated GIF burst recording.
//!
//! The burst blocks the control loop: it records at least the configured
//! minimum number of frames and keeps going while the shutter is held.
//! Instantaneous frame rates are sampled between consecutive frames and
//! summarised in a [`GifReport`] afterwards.

use log::{debug, info};
use serde::Serialize;

use crate::app::ports::{CameraBoard, Clock, GifSink, MediaPort};
use crate::config::TimingConfig;
use crate::error::CaptureError;

use super::imaging::Frame;

/// Frame-rate sampler for one burst.
#[derive(Debug, Clone, Default)]
pub struct FrameRateStats {
    samples: Vec<f32>,
    frames: u32,
    started_ms: u64,
    last_ms: u64,
}

impl FrameRateStats {
    pub fn start(now_ms: u64) -> Self {
        Self {
            samples: Vec::new(),
            frames: 0,
            started_ms: now_ms,
            last_ms: now_ms,
        }
    }

    /// Note that a frame finished at `now_ms`.
    pub fn record(&mut self, now_ms: u64) {
        self.frames += 1;
        let dt = now_ms.saturating_sub(self.last_ms);
        // Zero-length intervals have no meaningful rate.
        if dt > 0 {
            self.samples.push(1000.0 / dt as f32);
        }
        self.last_ms = now_ms;
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn report(&self, bytes: u64) -> GifReport {
        let elapsed_ms = self.last_ms.saturating_sub(self.started_ms);
        let avg_fps = if elapsed_ms > 0 {
            self.frames as f32 * 1000.0 / elapsed_ms as f32
        } else {
            0.0
        };

        let (best, worst, std_dev) = if self.samples.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let n = self.samples.len() as f32;
            let mean = self.samples.iter().sum::<f32>() / n;
            let var = self.samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / n;
            let best = self.samples.iter().copied().fold(f32::MIN, f32::max);
            let worst = self.samples.iter().copied().fold(f32::MAX, f32::min);
            (best, worst, var.sqrt())
        };

        GifReport {
            frames: self.frames,
            bytes,
            avg_fps,
            best_fps: best,
            worst_fps: worst,
            std_dev_fps: std_dev,
        }
    }
}

/// Summary of a finished burst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GifReport {
    pub frames: u32,
    pub bytes: u64,
    pub avg_fps: f32,
    pub best_fps: f32,
    pub worst_fps: f32,
    pub std_dev_fps: f32,
}

/// Record one burst into a new GIF.
///
/// `frame` is the working buffer; it holds the last recorded frame on
/// return.
pub fn record_burst<B, M, C>(
    board: &mut B,
    media: &mut M,
    clock: &C,
    frame: &mut Frame,
    timing: &TimingConfig,
) -> Result<GifReport, CaptureError>
where
    B: CameraBoard,
    M: MediaPort,
    C: Clock,
{
    if !media.is_mounted() {
        return Err(CaptureError::StorageUnavailable);
    }
    let mut gif = media.create_gif(frame.width(), frame.height())?;
    let mut stats = FrameRateStats::start(clock.uptime_ms());

    while stats.frames() < timing.gif_min_frames || board.shutter_held() {
        board.capture(frame);
        gif.add_frame(frame, timing.gif_frame_delay_ms)?;
        board.blit(frame);
        stats.record(clock.uptime_ms());
        debug!("gif frame {}", stats.frames());
    }

    let bytes = gif.finish()?;
    let report = stats.report(bytes);
    info!(
        "final size {} for {} frames, average framerate {:.1}fps",
        report.bytes, report.frames, report.avg_fps
    );
    Ok(report)
}
