//! Function-pointer finite state machine for the capture modes.
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │  ModeTable                                         │
//! │  ┌───────────┬───────────┬──────────┬───────────┐  │
//! │  │ Mode      │ on_enter  │ on_exit  │ on_update │  │
//! │  ├───────────┼───────────┼──────────┼───────────┤  │
//! │  │ Jpeg      │ fn(ctx)   │ -        │ fn(ctx)   │  │
//! │  │ Gif       │ fn(ctx)   │ -        │ fn(ctx)   │  │
//! │  │ GameBoy   │ fn(ctx)   │ -        │ fn(ctx)   │  │
//! │  │ Stop      │ fn(ctx)   │ -        │ fn(ctx)   │  │
//! │  │ Timelapse │ fn(ctx)   │ fn(ctx)  │ fn(ctx)   │  │
//! │  └───────────┴───────────┴──────────┴───────────┘  │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! Modes never transition on their own: the only way out of a mode is
//! [`ModeMachine::select`], driven by the local settings registry.  Each
//! tick the engine calls `on_update` for the current mode, which picks the
//! preview plan for that iteration.  On a selection the engine runs
//! `on_exit` for the old mode, then `on_enter` for the new one.

pub mod context;
pub mod states;

use context::ModeContext;
use log::info;

use crate::capture::CaptureMode;

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type ModeActionFn = fn(&mut ModeContext);

/// Signature for the per-tick update handler.
pub type ModeUpdateFn = fn(&mut ModeContext);

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single capture mode.
pub struct ModeDescriptor {
    pub id: CaptureMode,
    pub name: &'static str,
    pub on_enter: Option<ModeActionFn>,
    pub on_exit: Option<ModeActionFn>,
    pub on_update: ModeUpdateFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct ModeMachine {
    /// Fixed-size table indexed by `CaptureMode as usize`.
    table: [ModeDescriptor; CaptureMode::COUNT],
    current: usize,
}

impl ModeMachine {
    pub fn new(table: [ModeDescriptor; CaptureMode::COUNT], initial: CaptureMode) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ModeContext) {
        info!("capture starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one loop iteration.
    pub fn tick(&mut self, ctx: &mut ModeContext) {
        (self.table[self.current].on_update)(ctx);
    }

    /// Switch to `next`.  Re-selecting the current mode is a no-op.
    /// Returns `true` when a transition ran.
    pub fn select(&mut self, next: CaptureMode, ctx: &mut ModeContext) -> bool {
        if next as usize == self.current {
            return false;
        }
        let next_idx = next as usize;

        info!(
            "mode transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
        true
    }

    pub fn current_mode(&self) -> CaptureMode {
        self.table[self.current].id
    }
}
