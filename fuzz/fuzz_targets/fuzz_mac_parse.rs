//! Fuzz target: `MacAddr::from_str`
//!
//! The peer MAC arrives from `.env` at build time.  Parsing must never
//! panic, and any accepted address must survive a display round trip.
//!
//! cargo fuzz run fuzz_mac_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use shutterlink::protocol::MacAddr;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(mac) = text.parse::<MacAddr>() {
        let again: MacAddr = mac.to_string().parse().expect("display output must parse");
        assert_eq!(mac, again);
    }
});
