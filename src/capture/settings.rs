//! Camera settings registry.
//!
//! An ordered table of adjustable settings, navigated left/right and
//! adjusted up/down.  Slot 0 is "nothing selected".  Every value is an
//! index into a fixed option list and wraps at both ends.

use serde::{Deserialize, Serialize};

/// An adjustable camera setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    Resolution,
    LedLevel,
    LedColor,
    Mode,
    TimelapseRate,
    Effect,
}

impl SettingKey {
    /// Number of options this setting cycles through.
    pub const fn option_count(self) -> u8 {
        match self {
            Self::Resolution => 14,
            Self::LedLevel => 5,
            Self::LedColor => 8,
            Self::Mode => crate::capture::CaptureMode::COUNT as u8,
            Self::TimelapseRate => super::timelapse::TIMELAPSE_RATES.len() as u8,
            Self::Effect => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Resolution => "resolution",
            Self::LedLevel => "led_level",
            Self::LedColor => "led_color",
            Self::Mode => "mode",
            Self::TimelapseRate => "timelapse_rate",
            Self::Effect => "effect",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Navigation order.  `None` is the idle slot.
const ORDER: [Option<SettingKey>; 7] = [
    None,
    Some(SettingKey::Resolution),
    Some(SettingKey::LedLevel),
    Some(SettingKey::LedColor),
    Some(SettingKey::Mode),
    Some(SettingKey::TimelapseRate),
    Some(SettingKey::Effect),
];

#[derive(Debug, Clone)]
pub struct Settings {
    cursor: usize,
    values: [u8; 6],
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            values: [0; 6],
        }
    }

    /// Currently highlighted setting.
    pub fn selected(&self) -> Option<SettingKey> {
        ORDER[self.cursor]
    }

    pub fn value(&self, key: SettingKey) -> u8 {
        self.values[key.slot()]
    }

    /// Set a value directly, wrapping into range.
    pub fn set(&mut self, key: SettingKey, index: u8) {
        self.values[key.slot()] = index % key.option_count();
    }

    /// Move the cursor right.  `timelapse_rate` is skipped unless
    /// `timelapse_active`.
    pub fn next(&mut self, timelapse_active: bool) -> Option<SettingKey> {
        self.step(1, timelapse_active)
    }

    /// Move the cursor left.
    pub fn prev(&mut self, timelapse_active: bool) -> Option<SettingKey> {
        self.step(ORDER.len() - 1, timelapse_active)
    }

    fn step(&mut self, by: usize, timelapse_active: bool) -> Option<SettingKey> {
        self.cursor = (self.cursor + by) % ORDER.len();
        if !timelapse_active && ORDER[self.cursor] == Some(SettingKey::TimelapseRate) {
            self.cursor = (self.cursor + by) % ORDER.len();
        }
        self.selected()
    }

    /// Step the selected value up (`delta > 0`) or down, wrapping.
    /// Returns the key and its new value, or `None` on the idle slot.
    pub fn adjust(&mut self, delta: i8) -> Option<(SettingKey, u8)> {
        let key = self.selected()?;
        let count = i16::from(key.option_count());
        let current = i16::from(self.values[key.slot()]);
        let next = (current + i16::from(delta)).rem_euclid(count) as u8;
        self.values[key.slot()] = next;
        Some((key, next))
    }
}
