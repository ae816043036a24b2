//! Transmitter session: the remote's control loop.
//!
//! ```text
//!  KeyPort ──▶ press ──▶ RadioPort.send ──▶ grace ──▶ counters ──▶ Receipt
//!  RadioPort.recv ──▶ rssi ──▶ LinkQuality bar
//! ```
//!
//! At most one command is conceptually in flight.  A new press restarts the
//! receipt and highlight timers; nothing is queued.

use log::{debug, info, warn};

use crate::config::TimingConfig;
use crate::protocol::{Command, LinkQuality, MacAddr, SendOutcome};

use super::events::{AppEvent, Node};
use super::ports::{Clock, EventSink, KeyPort, RadioPort, RawPacket, RemoteDisplay};

/// Physical buttons on the remote.  The binding to commands is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteButton {
    Shutter,
    Focus,
    Ping,
}

impl RemoteButton {
    pub const fn command(self) -> Command {
        match self {
            Self::Shutter => Command::Snap,
            Self::Focus => Command::Focus,
            Self::Ping => Command::Ping,
        }
    }
}

/// Send feedback box on the remote display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Receipt {
    #[default]
    Hidden,
    /// Last send was delivered; shows the command label.
    Ack(Command),
    Fail,
}

impl Receipt {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Hidden => "",
            Self::Ack(c) => c.label(),
            Self::Fail => "FAIL",
        }
    }
}

/// Everything the remote display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUi {
    pub highlighted: Option<RemoteButton>,
    pub receipt: Receipt,
    pub link_quality: LinkQuality,
}

impl Default for RemoteUi {
    fn default() -> Self {
        Self {
            highlighted: None,
            receipt: Receipt::Hidden,
            link_quality: LinkQuality::ZERO,
        }
    }
}

pub struct TransmitterSession {
    peer: MacAddr,
    timing: TimingConfig,
    ui: RemoteUi,
    receipt_until: Option<u64>,
    highlight_until: Option<u64>,
    dirty: bool,
}

impl TransmitterSession {
    pub fn new(peer: MacAddr, timing: TimingConfig) -> Self {
        Self {
            peer,
            timing,
            ui: RemoteUi::default(),
            receipt_until: None,
            highlight_until: None,
            dirty: true,
        }
    }

    pub fn ui(&self) -> &RemoteUi {
        &self.ui
    }

    pub fn peer(&self) -> MacAddr {
        self.peer
    }

    pub fn start(&mut self, display: &mut impl RemoteDisplay, sink: &mut impl EventSink) {
        info!("remote session started, peer {}", self.peer);
        display.render(&self.ui);
        self.dirty = false;
        sink.emit(&AppEvent::Started(Node::Remote));
    }

    /// One loop iteration: key edge, one inbound packet, timer expiry,
    /// redraw if anything changed.
    pub fn tick<K, R, C, D, S>(
        &mut self,
        keys: &mut K,
        radio: &mut R,
        clock: &mut C,
        display: &mut D,
        sink: &mut S,
    ) where
        K: KeyPort,
        R: RadioPort,
        C: Clock,
        D: RemoteDisplay,
        S: EventSink,
    {
        if let Some(button) = keys.poll(clock.uptime_ms()) {
            self.press(button, radio, clock, sink);
        }
        if let Some(packet) = radio.recv() {
            self.on_packet(&packet, sink);
        }
        self.expire(clock.uptime_ms());

        if self.dirty {
            display.render(&self.ui);
            self.dirty = false;
        }
    }

    /// Send the button's command and classify the outcome after the grace
    /// period.  A pending outcome leaves the receipt untouched.
    pub fn press<R, C, S>(
        &mut self,
        button: RemoteButton,
        radio: &mut R,
        clock: &mut C,
        sink: &mut S,
    ) -> SendOutcome
    where
        R: RadioPort,
        C: Clock,
        S: EventSink,
    {
        let command = button.command();
        self.ui.highlighted = Some(button);
        self.highlight_until = Some(clock.uptime_ms() + u64::from(self.timing.highlight_ms));
        self.dirty = true;

        let before = radio.counters();
        let sent = radio.send(self.peer, command.encode());
        if let Err(e) = sent {
            warn!("sending {command} to {} failed: {e}", self.peer);
        }
        clock.delay_ms(self.timing.send_grace_ms);
        let after = radio.counters();

        let outcome = SendOutcome::classify(before, after, sent);
        let now = clock.uptime_ms();
        match outcome {
            SendOutcome::Delivered => {
                self.ui.receipt = Receipt::Ack(command);
                self.receipt_until = Some(now + u64::from(self.timing.ack_display_ms));
            }
            SendOutcome::Failed => {
                self.ui.receipt = Receipt::Fail;
                self.ui.link_quality = LinkQuality::ZERO;
                self.receipt_until = Some(now + u64::from(self.timing.fail_display_ms));
            }
            SendOutcome::Pending => debug!("{command}: no delivery report within grace period"),
        }

        sink.emit(&AppEvent::CommandSent { command, outcome });
        outcome
    }

    /// Any inbound packet refreshes the link bar.  Content is only logged.
    pub fn on_packet(&mut self, packet: &RawPacket, sink: &mut impl EventSink) {
        match Command::decode(&packet.payload) {
            Ok(command) => debug!("echo {command} from {}", packet.src),
            Err(e) => debug!("{} byte packet from {}: {e}", packet.payload.len(), packet.src),
        }
        let quality = LinkQuality::from_rssi(i32::from(packet.rssi));
        if quality != self.ui.link_quality {
            self.ui.link_quality = quality;
            self.dirty = true;
        }
        sink.emit(&AppEvent::LinkSample {
            rssi: packet.rssi,
            quality,
        });
    }

    /// Clear the receipt and highlight once their timers run out.
    pub fn expire(&mut self, now_ms: u64) {
        if self.receipt_until.is_some_and(|t| now_ms >= t) {
            self.receipt_until = None;
            self.ui.receipt = Receipt::Hidden;
            self.dirty = true;
        }
        if self.highlight_until.is_some_and(|t| now_ms >= t) {
            self.highlight_until = None;
            self.ui.highlighted = None;
            self.dirty = true;
        }
    }
}
