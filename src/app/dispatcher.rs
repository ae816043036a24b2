//! Receiver dispatcher: decodes inbound commands, echoes them, and maps
//! both remote commands and local shutter gestures onto one [`Trigger`].
//!
//! | Source              | Trigger         |
//! |---------------------|-----------------|
//! | local long press    | `focus`         |
//! | remote `"focus"`    | `focus`         |
//! | local short press   | `snap`          |
//! | remote `"snap"`     | `snap`          |
//! | remote `"ping"`     | none (echo only)|

use log::{debug, info, warn};

use crate::capture::Trigger;
use crate::drivers::button::ButtonEvent;
use crate::protocol::Command;

use super::events::AppEvent;
use super::ports::{EventSink, RadioPort};

#[derive(Debug, Default)]
pub struct ReceiverDispatcher {
    received: u32,
    dropped: u32,
}

impl ReceiverDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking: read at most one packet.  A decoded command is echoed
    /// verbatim to its sender.  Decode and echo failures are logged and
    /// swallowed.
    pub fn poll<R: RadioPort, S: EventSink>(
        &mut self,
        radio: &mut R,
        sink: &mut S,
    ) -> Option<Command> {
        let packet = radio.recv()?;

        let command = match Command::decode(&packet.payload) {
            Ok(command) => command,
            Err(e) => {
                self.dropped += 1;
                debug!("dropping {} byte payload from {}: {e}", packet.payload.len(), packet.src);
                sink.emit(&AppEvent::PayloadDropped {
                    len: packet.payload.len(),
                });
                return None;
            }
        };

        self.received += 1;
        info!("received: {command} from {} ({} dBm)", packet.src, packet.rssi);
        sink.emit(&AppEvent::CommandReceived {
            command,
            from: packet.src,
        });

        if let Err(error) = radio.send(packet.src, &packet.payload) {
            warn!("echo of {command} to {} failed: {error}", packet.src);
            sink.emit(&AppEvent::EchoFailed { command, error });
        }

        Some(command)
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Trigger from a local shutter gesture.
pub const fn local_trigger(event: Option<ButtonEvent>) -> Trigger {
    match event {
        Some(ButtonEvent::LongPress) => Trigger { focus: true, snap: false },
        Some(ButtonEvent::ShortPress) => Trigger { focus: false, snap: true },
        None => Trigger::NONE,
    }
}

/// Trigger from a decoded remote command.
pub const fn remote_trigger(command: Option<Command>) -> Trigger {
    match command {
        Some(Command::Focus) => local_trigger(Some(ButtonEvent::LongPress)),
        Some(Command::Snap) => local_trigger(Some(ButtonEvent::ShortPress)),
        Some(Command::Ping) | None => Trigger::NONE,
    }
}
