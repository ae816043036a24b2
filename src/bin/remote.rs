//! Shutterlink remote: handheld transmitter firmware.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  RemoteKeys   EspNowRadio   SystemClock              │
//! │  (KeyPort)    (RadioPort)   (Clock)                  │
//! │  LogRemoteDisplay           LogEventSink             │
//! │  ──────────── Port Trait Boundary ────────────────   │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │        TransmitterSession (pure logic)         │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, LevelFilter};

use shutterlink::adapters::espnow::{start_wifi, EspNowRadio};
use shutterlink::adapters::keys::{GpioKey, Polarity, RemoteKeys};
use shutterlink::adapters::log_display::LogRemoteDisplay;
use shutterlink::adapters::log_sink::LogEventSink;
use shutterlink::adapters::time::SystemClock;
use shutterlink::app::ports::Clock;
use shutterlink::app::remote::TransmitterSession;
use shutterlink::config::{LinkConfig, LinkMode, TimingConfig};
use shutterlink::error::Error;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let link = LinkConfig::from_build_env().map_err(Error::from)?;
    log::set_max_level(if link.debug { LevelFilter::Debug } else { LevelFilter::Info });
    info!("shutterlink remote v{}", env!("CARGO_PKG_VERSION"));
    match link.mode {
        LinkMode::PeerToPeer => info!("ESP-NOW peer to peer mode, peer {}", link.destination()),
        LinkMode::Broadcast => info!("ESP-NOW broadcast mode"),
    }
    let timing = TimingConfig::default();

    // ── 2. Radio ──────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = start_wifi(peripherals.modem, sysloop, Some(nvs), link.channel)?;
    let mut radio = EspNowRadio::new(link.channel)?;
    radio.add_peer(link.destination()).map_err(Error::from)?;

    // ── 3. Keys ───────────────────────────────────────────────
    let mut shutter = PinDriver::input(peripherals.pins.gpio0)?;
    shutter.set_pull(Pull::Up)?;
    let mut focus = PinDriver::input(peripherals.pins.gpio1)?;
    focus.set_pull(Pull::Down)?;
    let mut ping = PinDriver::input(peripherals.pins.gpio2)?;
    ping.set_pull(Pull::Down)?;
    let mut keys = RemoteKeys {
        shutter: GpioKey::new(shutter, Polarity::ActiveLow, timing.debounce_ms),
        focus: GpioKey::new(focus, Polarity::ActiveHigh, timing.debounce_ms),
        ping: GpioKey::new(ping, Polarity::ActiveHigh, timing.debounce_ms),
    };

    // ── 4. Control loop ───────────────────────────────────────
    let mut clock = SystemClock::new();
    let mut display = LogRemoteDisplay::new();
    let mut sink = LogEventSink::new();
    let poll_ms = timing.remote_poll_ms;
    let mut session = TransmitterSession::new(link.destination(), timing);
    session.start(&mut display, &mut sink);

    loop {
        session.tick(&mut keys, &mut radio, &mut clock, &mut display, &mut sink);
        clock.delay_ms(poll_ms);
    }
}
