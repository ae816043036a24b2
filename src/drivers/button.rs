//! Level-sampled debounced button driver with short and long press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  The control loop samples
//! the line level every iteration and feeds it to [`ButtonDriver::tick`],
//! which runs the debounce and gesture state machine.  No interrupts are
//! involved; both nodes poll at loop rate.
//!
//! ## Gesture detection
//!
//! | Gesture     | Condition                          | Event        |
//! |-------------|------------------------------------|--------------|
//! | Short press | Released before the long threshold | `ShortPress` |
//! | Long press  | Held for the long threshold        | `LongPress`  |
//!
//! A long press fires once, while still held; the later release is silent.

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

/// Debounced view of a single raw line.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    settle_ms: u32,
    stable: bool,
    candidate: bool,
    since_ms: u64,
}

impl Debouncer {
    pub const fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            stable: false,
            candidate: false,
            since_ms: 0,
        }
    }

    /// Feed a raw sample (`true` = pressed).  Returns `Some(level)` on the
    /// sample where the debounced level changes.
    pub fn update(&mut self, now_ms: u64, raw: bool) -> Option<bool> {
        if raw != self.candidate {
            self.candidate = raw;
            self.since_ms = now_ms;
        }
        if self.candidate != self.stable
            && now_ms.saturating_sub(self.since_ms) >= u64::from(self.settle_ms)
        {
            self.stable = self.candidate;
            return Some(self.stable);
        }
        None
    }

    /// Feed a raw sample and report only the press edge.
    pub fn pressed_edge(&mut self, now_ms: u64, raw: bool) -> bool {
        self.update(now_ms, raw) == Some(true)
    }

    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Pressed { since_ms: u64 },
    /// Long press already reported; wait for release.
    Latched,
}

/// Shutter-style button: debounced, classified into short / long presses.
pub struct ButtonDriver {
    debounce: Debouncer,
    long_press_ms: u32,
    state: GestureState,
}

impl ButtonDriver {
    pub fn new(debounce_ms: u32, long_press_ms: u32) -> Self {
        Self {
            debounce: Debouncer::new(debounce_ms),
            long_press_ms,
            state: GestureState::Idle,
        }
    }

    /// Call once per loop iteration with the raw line level.
    /// Returns a classified gesture event, if any.
    pub fn tick(&mut self, now_ms: u64, raw_pressed: bool) -> Option<ButtonEvent> {
        let edge = self.debounce.update(now_ms, raw_pressed);

        match (self.state, edge) {
            (GestureState::Idle, Some(true)) => {
                self.state = GestureState::Pressed { since_ms: now_ms };
                None
            }
            (GestureState::Pressed { .. }, Some(false)) => {
                self.state = GestureState::Idle;
                Some(ButtonEvent::ShortPress)
            }
            (GestureState::Pressed { since_ms }, _) => {
                if now_ms.saturating_sub(since_ms) >= u64::from(self.long_press_ms) {
                    self.state = GestureState::Latched;
                    Some(ButtonEvent::LongPress)
                } else {
                    None
                }
            }
            (GestureState::Latched, Some(false)) => {
                self.state = GestureState::Idle;
                None
            }
            _ => None,
        }
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.debounce.is_pressed()
    }
}
