//! Link and timing configuration.
//!
//! Settings are environment-style key/value pairs read once at startup.
//! Firmware builds get them embedded by `build.rs` (from `.env` or the build
//! environment); host builds read the process environment.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::protocol::MacAddr;

pub const KEY_PEER_MAC: &str = "SHUTTERLINK_PEER_MAC";
pub const KEY_BROADCAST: &str = "SHUTTERLINK_BROADCAST";
pub const KEY_DEBUG: &str = "SHUTTERLINK_DEBUG";
pub const KEY_CHANNEL: &str = "SHUTTERLINK_CHANNEL";

/// Default 2.4 GHz channel shared by both nodes.
pub const DEFAULT_CHANNEL: u8 = 6;

/// How outbound datagrams are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkMode {
    /// Unicast to the configured peer (MAC-layer acks drive the counters).
    PeerToPeer,
    /// Unrestricted broadcast to `ff:ff:ff:ff:ff:ff`.
    Broadcast,
}

/// Wireless link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub mode: LinkMode,
    /// The statically configured peer.  Required in point-to-point mode.
    pub peer: Option<MacAddr>,
    /// Radio channel (1–13).
    pub channel: u8,
    /// Verbose logging, including dropped inbound payloads.
    pub debug: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            mode: LinkMode::Broadcast,
            peer: None,
            channel: DEFAULT_CHANNEL,
            debug: false,
        }
    }
}

impl LinkConfig {
    /// Build from a key lookup (environment, `.env`, embedded build values).
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let broadcast = get(KEY_BROADCAST).map_or(Ok(false), |v| parse_flag(&v, KEY_BROADCAST))?;
        let debug = get(KEY_DEBUG).map_or(Ok(false), |v| parse_flag(&v, KEY_DEBUG))?;
        let peer = get(KEY_PEER_MAC).map(|v| v.parse::<MacAddr>()).transpose()?;
        let channel = match get(KEY_CHANNEL) {
            Some(v) => v
                .parse::<u8>()
                .ok()
                .filter(|c| (1..=13).contains(c))
                .ok_or(ConfigError::InvalidValue(KEY_CHANNEL))?,
            None => DEFAULT_CHANNEL,
        };

        let mode = if broadcast {
            LinkMode::Broadcast
        } else {
            if peer.is_none() {
                return Err(ConfigError::MissingPeer);
            }
            LinkMode::PeerToPeer
        };

        Ok(Self {
            mode,
            peer,
            channel,
            debug,
        })
    }

    /// Build from the values `build.rs` embedded into the binary.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                KEY_PEER_MAC => env!("SHUTTERLINK_PEER_MAC"),
                KEY_BROADCAST => env!("SHUTTERLINK_BROADCAST"),
                KEY_DEBUG => env!("SHUTTERLINK_DEBUG"),
                KEY_CHANNEL => env!("SHUTTERLINK_CHANNEL"),
                _ => "",
            };
            Some(value.to_string())
        })
    }

    /// Destination for outbound datagrams.
    pub fn destination(&self) -> MacAddr {
        match (self.mode, self.peer) {
            (LinkMode::PeerToPeer, Some(peer)) => peer,
            _ => MacAddr::BROADCAST,
        }
    }
}

fn parse_flag(value: &str, key: &'static str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key)),
    }
}

/// Fixed intervals used by both control loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    // --- Remote ---
    /// Blocking wait after a send before reading the counters (ms).
    pub send_grace_ms: u32,
    /// How long a delivered receipt stays on screen (ms).
    pub ack_display_ms: u32,
    /// How long a failure receipt stays on screen (ms).
    pub fail_display_ms: u32,
    /// How long a pressed button stays highlighted (ms).
    pub highlight_ms: u32,
    /// Remote loop polling interval (ms).
    pub remote_poll_ms: u32,

    // --- Camera ---
    /// Blocking wait after an on-screen capture error (ms).
    pub error_display_ms: u32,
    /// Storage mount attempts on card insertion.
    pub mount_attempts: u8,
    /// Delay between mount attempts (ms).
    pub mount_retry_delay_ms: u32,
    /// Minimum frames recorded per GIF burst.
    pub gif_min_frames: u32,
    /// Per-frame delay written into the GIF (ms).
    pub gif_frame_delay_ms: u32,
    /// Hold time that turns a shutter press into a long press (ms).
    pub long_press_ms: u32,
    /// Key debounce settle time (ms).
    pub debounce_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            send_grace_ms: 50,
            ack_display_ms: 750,
            fail_display_ms: 2000,
            highlight_ms: 750,
            remote_poll_ms: 50,

            error_display_ms: 500,
            mount_attempts: 3,
            mount_retry_delay_ms: 500,
            gif_min_frames: 15,
            gif_frame_delay_ms: 120,
            long_press_ms: 1000,
            debounce_ms: 10,
        }
    }
}
