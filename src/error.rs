//! Unified error types for the shutter link.
//!
//! Every subsystem has its own small `Copy` error enum; all of them convert
//! into the top-level [`Error`] so adapters and binaries can report failures
//! uniformly.  None of these ever leave the control loop: each kind has a
//! local recovery path at the point where it occurs.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The wireless transport rejected or lost a send.
    Transport(TransportError),
    /// An inbound payload was not part of the command vocabulary.
    Decode(DecodeError),
    /// A still or GIF could not be persisted.
    Capture(CaptureError),
    /// Removable storage could not be mounted.
    Mount(MountError),
    /// Startup settings are missing or malformed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Capture(e) => write!(f, "capture: {e}"),
            Self::Mount(e) => write!(f, "mount: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The radio refused the frame (queue full, driver error).
    SendFailed,
    /// The destination is not in the peer list and could not be added.
    PeerUnavailable,
    /// Payload exceeds the datagram size limit.
    PayloadTooLarge,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendFailed => write!(f, "send failed"),
            Self::PeerUnavailable => write!(f, "peer unavailable"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload does not spell any known command.
    UnknownCommand,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => write!(f, "unknown command"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Capture persistence errors
// ---------------------------------------------------------------------------

/// Why a still or GIF could not be written.
///
/// The two kinds map to two different on-screen messages, so callers must
/// match on them rather than treat capture failure as a single case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The codec rejected the frame (format / type mismatch).
    Encoding,
    /// No writable storage is mounted.
    StorageUnavailable,
}

impl CaptureError {
    /// Message shown on the viewfinder for this failure.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Encoding => "Failed",
            Self::StorageUnavailable => "Error\nNo SD Card",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "encoding failed"),
            Self::StorageUnavailable => write!(f, "no storage mounted"),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Storage mount errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    /// No card present in the slot.
    NoCard,
    /// The filesystem could not be opened.
    Io,
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCard => write!(f, "no card present"),
            Self::Io => write!(f, "filesystem I/O error"),
        }
    }
}

impl From<MountError> for Error {
    fn from(e: MountError) -> Self {
        Self::Mount(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Point-to-point mode needs a peer MAC and none was provided.
    MissingPeer,
    /// The peer MAC is not six colon-separated hex octets.
    InvalidMac,
    /// A setting failed validation; the string names the key.
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeer => write!(f, "peer MAC required in point-to-point mode"),
            Self::InvalidMac => write!(f, "malformed MAC address"),
            Self::InvalidValue(key) => write!(f, "invalid value for {key}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
