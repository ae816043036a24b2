//! Command codec.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// The closed command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Snap,
    Focus,
    Ping,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Snap, Command::Focus, Command::Ping];

    /// Wire token for this command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snap => "snap",
            Self::Focus => "focus",
            Self::Ping => "ping",
        }
    }

    /// Encode to the wire payload.
    pub const fn encode(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Decode a wire payload.  Anything outside the vocabulary, including
    /// invalid UTF-8 and case variants, is [`DecodeError::UnknownCommand`].
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        Self::ALL
            .into_iter()
            .find(|c| c.encode() == payload)
            .ok_or(DecodeError::UnknownCommand)
    }

    /// Upper-case label used on the remote's receipt indicator.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Snap => "SNAP",
            Self::Focus => "FOCUS",
            Self::Ping => "PING",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s.as_bytes())
    }
}
