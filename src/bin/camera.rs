//! Shutterlink camera: receiver firmware for the MEMENTO board.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  MementoBoard        EspNowRadio   DirectoryMedia    │
//! │  (Camera+Controls+   (RadioPort)   (MediaPort)       │
//! │   Viewfinder)        SystemClock   LogEventSink      │
//! │  ──────────── Port Trait Boundary ────────────────   │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │  CameraService: Dispatcher · CaptureController │  │
//! │  │                 ModeMachine · Timelapse        │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::FromValueType;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, LevelFilter};

use shutterlink::adapters::espnow::{start_wifi, EspNowRadio};
use shutterlink::adapters::log_sink::LogEventSink;
use shutterlink::adapters::media::DirectoryMediaStore;
use shutterlink::adapters::memento::{init_camera, MementoBoard};
use shutterlink::adapters::time::SystemClock;
use shutterlink::app::camera::CameraService;
use shutterlink::app::ports::CameraPort;
use shutterlink::config::{LinkConfig, TimingConfig};
use shutterlink::error::Error;
use shutterlink::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let link = LinkConfig::from_build_env().map_err(Error::from)?;
    log::set_max_level(if link.debug { LevelFilter::Debug } else { LevelFilter::Info });
    info!("shutterlink camera v{}", env!("CARGO_PKG_VERSION"));
    let timing = TimingConfig::default();

    // ── 2. Radio ──────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = start_wifi(peripherals.modem, sysloop, Some(nvs), link.channel)?;
    let mut radio = EspNowRadio::new(link.channel)?;
    radio.add_peer(link.destination()).map_err(Error::from)?;

    // ── 3. Board ──────────────────────────────────────────────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio34,
        peripherals.pins.gpio33,
        &I2cConfig::new().baudrate(400.kHz().into()),
    )?;
    init_camera()?;
    let mut shutter = PinDriver::input(AnyIOPin::from(peripherals.pins.gpio0))?;
    shutter.set_pull(Pull::Up)?;
    let mut board = MementoBoard::new(i2c, shutter, &timing);

    // Mounted by the card-detect edge on the first poll.
    let mut media = DirectoryMediaStore::new(pins::SD_MOUNT_POINT);

    // ── 4. Control loop ───────────────────────────────────────
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut service = CameraService::new(board.frame_size(), timing);
    service.start(&mut board, &media, &mut sink);
    info!("Starting!");

    loop {
        service.tick(&mut board, &mut media, &mut radio, &mut clock, &mut sink);
    }
}
