//! ESP-NOW radio adapter (ESP-IDF only).
//!
//! Implements [`RadioPort`] on top of `esp_idf_svc::espnow`.
//!
//! - Delivery reports arrive on the Wi-Fi task through the send callback,
//!   which bumps two static atomics.  The domain only ever reads them.
//! - Received frames are copied into a small bounded queue by the receive
//!   callback and drained by [`RadioPort::recv`].  Overflow drops the
//!   newest frame.
//! - Destinations that are not yet registered are added to the peer list
//!   on first use, up to two peers.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use esp_idf_svc::espnow::{EspNow, PeerInfo, ReceiveInfo, SendStatus};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys::{self, esp, EspError};
use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use crate::app::ports::{RadioPort, RawPacket, MAX_PAYLOAD};
use crate::error::TransportError;
use crate::protocol::{MacAddr, SendCounters};

const RX_QUEUE_DEPTH: usize = 8;
const MAX_PEERS: usize = 2;

static SENT_OK: AtomicU32 = AtomicU32::new(0);
static SENT_FAIL: AtomicU32 = AtomicU32::new(0);
static RX_QUEUE: Mutex<heapless::Deque<RawPacket, RX_QUEUE_DEPTH>> =
    Mutex::new(heapless::Deque::new());

/// Start Wi-Fi in station mode (no association) and pin the channel.
/// ESP-NOW needs the Wi-Fi driver running; the returned handle must stay
/// alive for as long as the radio is used.
pub fn start_wifi(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: Option<EspDefaultNvsPartition>,
    channel: u8,
) -> Result<EspWifi<'static>, EspError> {
    let mut wifi = EspWifi::new(modem, sysloop, nvs)?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;
    // SAFETY: the Wi-Fi driver is started; channel is validated by LinkConfig.
    esp!(unsafe {
        sys::esp_wifi_set_channel(channel, sys::wifi_second_chan_t_WIFI_SECOND_CHAN_NONE)
    })?;
    info!("wifi: station started on channel {channel}");
    Ok(wifi)
}

pub struct EspNowRadio {
    espnow: EspNow<'static>,
    channel: u8,
    peers: heapless::Vec<MacAddr, MAX_PEERS>,
}

impl EspNowRadio {
    /// Take the ESP-NOW driver and install both callbacks.
    pub fn new(channel: u8) -> Result<Self, EspError> {
        let espnow = EspNow::take()?;

        espnow.register_send_cb(|_mac: &[u8], status: SendStatus| match status {
            SendStatus::SUCCESS => {
                SENT_OK.fetch_add(1, Ordering::Release);
            }
            SendStatus::FAIL => {
                SENT_FAIL.fetch_add(1, Ordering::Release);
            }
        })?;

        espnow.register_recv_cb(|info: &ReceiveInfo, data: &[u8]| {
            let mut payload = heapless::Vec::<u8, MAX_PAYLOAD>::new();
            if payload.extend_from_slice(data).is_err() {
                return;
            }
            let packet = RawPacket {
                src: MacAddr(*info.src_addr),
                payload,
                rssi: info.rx_ctrl.rssi() as i8,
            };
            if let Ok(mut queue) = RX_QUEUE.lock() {
                let _ = queue.push_back(packet);
            }
        })?;

        info!("espnow: driver up");
        Ok(Self {
            espnow,
            channel,
            peers: heapless::Vec::new(),
        })
    }

    /// Register `mac` in the driver's peer list.  Idempotent.
    pub fn add_peer(&mut self, mac: MacAddr) -> Result<(), TransportError> {
        if self.peers.contains(&mac) {
            return Ok(());
        }
        if self.peers.is_full() {
            warn!("espnow: peer list full, refusing {mac}");
            return Err(TransportError::PeerUnavailable);
        }
        let info = PeerInfo {
            peer_addr: mac.octets(),
            channel: self.channel,
            ifidx: sys::wifi_interface_t_WIFI_IF_STA,
            encrypt: false,
            ..Default::default()
        };
        self.espnow.add_peer(info).map_err(|e| {
            warn!("espnow: add_peer {mac} failed: {e}");
            TransportError::PeerUnavailable
        })?;
        let _ = self.peers.push(mac);
        info!("espnow: peer {mac} added");
        Ok(())
    }
}

impl RadioPort for EspNowRadio {
    fn send(&mut self, peer: MacAddr, payload: &[u8]) -> Result<(), TransportError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(TransportError::PayloadTooLarge);
        }
        self.add_peer(peer)?;
        self.espnow.send(peer.octets(), payload).map_err(|e| {
            warn!("espnow: send to {peer} failed: {e}");
            TransportError::SendFailed
        })
    }

    fn recv(&mut self) -> Option<RawPacket> {
        RX_QUEUE.lock().ok()?.pop_front()
    }

    fn counters(&self) -> SendCounters {
        SendCounters::new(SENT_OK.load(Ordering::Acquire), SENT_FAIL.load(Ordering::Acquire))
    }
}
