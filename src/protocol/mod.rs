//! Wire protocol between the remote and the camera.
//!
//! ```text
//!   remote ── "snap" / "focus" / "ping" ──▶ camera
//!   remote ◀──────── same payload ───────── camera   (echo = ack)
//! ```
//!
//! Payloads are bare lowercase ASCII tokens with no framing, version field
//! or checksum.  The camera echoes exactly what it decoded so the remote can
//! sample signal strength even for a no-op `ping`.

pub mod command;
pub mod link;
pub mod peer;

pub use command::Command;
pub use link::{LinkQuality, SendCounters, SendOutcome};
pub use peer::MacAddr;
