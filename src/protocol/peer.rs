//! Peer addressing.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 48-bit station MAC address identifying a wireless peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Unrestricted broadcast destination.
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl FromStr for MacAddr {
    type Err = ConfigError;

    /// Parse `"aa:bb:cc:dd:ee:ff"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; 6];
        let mut parts = s.trim().split(':');
        for slot in &mut out {
            let part = parts.next().ok_or(ConfigError::InvalidMac)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidMac);
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| ConfigError::InvalidMac)?;
        }
        if parts.next().is_some() {
            return Err(ConfigError::InvalidMac);
        }
        Ok(Self(out))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
