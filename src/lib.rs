//! Shutterlink library.
//!
//! A two-node remote shutter: a handheld remote sends `snap` / `focus` /
//! `ping` over ESP-NOW and a camera-side receiver runs the capture modes.
//! Everything here is pure logic behind port traits; ESP-IDF-specific
//! adapters are compiled only with the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod capture;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod protocol;
