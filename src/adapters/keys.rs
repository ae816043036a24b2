//! GPIO key adapters built on `embedded-hal` input pins.
//!
//! [`GpioKey`] debounces one line; [`RemoteKeys`] scans the remote's three
//! buttons and implements [`KeyPort`].

use embedded_hal::digital::InputPin;

use crate::app::ports::KeyPort;
use crate::app::remote::RemoteButton;
use crate::drivers::button::Debouncer;

/// Electrical polarity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pressed pulls the line low (pull-up fitted).
    ActiveLow,
    /// Pressed drives the line high (pull-down fitted).
    ActiveHigh,
}

pub struct GpioKey<P> {
    pin: P,
    polarity: Polarity,
    debounce: Debouncer,
}

impl<P: InputPin> GpioKey<P> {
    pub fn new(pin: P, polarity: Polarity, debounce_ms: u32) -> Self {
        Self {
            pin,
            polarity,
            debounce: Debouncer::new(debounce_ms),
        }
    }

    /// Undebounced level.  A read error counts as released.
    pub fn raw_pressed(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high == (self.polarity == Polarity::ActiveHigh),
            Err(_) => false,
        }
    }

    /// Sample and report the debounced press edge.
    pub fn pressed_edge(&mut self, now_ms: u64) -> bool {
        let raw = self.raw_pressed();
        self.debounce.pressed_edge(now_ms, raw)
    }
}

/// The remote's shutter / focus / ping buttons.
pub struct RemoteKeys<S, F, P> {
    pub shutter: GpioKey<S>,
    pub focus: GpioKey<F>,
    pub ping: GpioKey<P>,
}

impl<S: InputPin, F: InputPin, P: InputPin> KeyPort for RemoteKeys<S, F, P> {
    /// Every key is sampled each poll; the first edge in shutter, focus,
    /// ping order wins.
    fn poll(&mut self, now_ms: u64) -> Option<RemoteButton> {
        let shutter = self.shutter.pressed_edge(now_ms);
        let focus = self.focus.pressed_edge(now_ms);
        let ping = self.ping.pressed_edge(now_ms);

        if shutter {
            Some(RemoteButton::Shutter)
        } else if focus {
            Some(RemoteButton::Focus)
        } else if ping {
            Some(RemoteButton::Ping)
        } else {
            None
        }
    }
}
