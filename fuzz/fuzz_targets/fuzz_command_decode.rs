//! Fuzz target: `Command::decode`
//!
//! Inbound ESP-NOW payloads come from any node on the channel.  Decoding
//! must never panic, and anything it accepts must re-encode to exactly the
//! bytes that were received.
//!
//! cargo fuzz run fuzz_command_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use shutterlink::protocol::Command;

fuzz_target!(|data: &[u8]| {
    if let Ok(command) = Command::decode(data) {
        assert_eq!(command.encode(), data, "decode accepted a non-canonical payload");
        assert!(data.len() <= 5);
    }
});
