//! In-memory radio pair for host simulation and end-to-end tests.
//!
//! Two [`LoopbackRadio`] endpoints share one medium.  A send to the other
//! endpoint's MAC (or broadcast) lands in its receive queue and bumps the
//! sender's `sent_ok`; with delivery disabled it bumps `sent_fail`
//! instead.  With deferred acknowledgement the counter bump waits for
//! [`LoopbackRadio::flush_acks`], which models a report that arrives after
//! the grace period.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::app::ports::{RadioPort, RawPacket, MAX_PAYLOAD};
use crate::error::TransportError;
use crate::protocol::{MacAddr, SendCounters};

#[derive(Debug)]
struct Endpoint {
    mac: MacAddr,
    inbox: VecDeque<RawPacket>,
    counters: SendCounters,
    /// Unreported outcomes, `true` = delivered.
    pending: Vec<bool>,
}

#[derive(Debug)]
struct Medium {
    ends: [Endpoint; 2],
    deliver: bool,
    deferred_ack: bool,
    rssi: i8,
}

pub struct LoopbackRadio {
    medium: Rc<RefCell<Medium>>,
    side: usize,
}

/// Create a connected pair.
pub fn pair(a: MacAddr, b: MacAddr) -> (LoopbackRadio, LoopbackRadio) {
    let endpoint = |mac| Endpoint {
        mac,
        inbox: VecDeque::new(),
        counters: SendCounters::default(),
        pending: Vec::new(),
    };
    let medium = Rc::new(RefCell::new(Medium {
        ends: [endpoint(a), endpoint(b)],
        deliver: true,
        deferred_ack: false,
        rssi: -60,
    }));
    (
        LoopbackRadio {
            medium: Rc::clone(&medium),
            side: 0,
        },
        LoopbackRadio { medium, side: 1 },
    )
}

impl LoopbackRadio {
    pub fn mac(&self) -> MacAddr {
        self.medium.borrow().ends[self.side].mac
    }

    /// Drop every frame from now on (both directions).
    pub fn set_delivery(&self, deliver: bool) {
        self.medium.borrow_mut().deliver = deliver;
    }

    /// Signal strength stamped on delivered frames.
    pub fn set_rssi(&self, rssi: i8) {
        self.medium.borrow_mut().rssi = rssi;
    }

    /// Hold delivery reports until [`flush_acks`](Self::flush_acks).
    pub fn set_deferred_ack(&self, deferred: bool) {
        self.medium.borrow_mut().deferred_ack = deferred;
    }

    /// Apply this endpoint's held delivery reports to its counters.
    pub fn flush_acks(&self) {
        let mut medium = self.medium.borrow_mut();
        let end = &mut medium.ends[self.side];
        for delivered in end.pending.drain(..) {
            if delivered {
                end.counters.sent_ok += 1;
            } else {
                end.counters.sent_fail += 1;
            }
        }
    }

    /// Queue a raw frame as if `from` had sent it to this endpoint.
    pub fn inject(&self, from: MacAddr, payload: &[u8], rssi: i8) {
        let mut buf = heapless::Vec::new();
        if buf.extend_from_slice(payload).is_ok() {
            self.medium.borrow_mut().ends[self.side].inbox.push_back(RawPacket {
                src: from,
                payload: buf,
                rssi,
            });
        }
    }

    pub fn pending_rx(&self) -> usize {
        self.medium.borrow().ends[self.side].inbox.len()
    }
}

impl RadioPort for LoopbackRadio {
    fn send(&mut self, peer: MacAddr, payload: &[u8]) -> Result<(), TransportError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(TransportError::PayloadTooLarge);
        }
        let mut medium = self.medium.borrow_mut();
        let other = 1 - self.side;
        if !peer.is_broadcast() && peer != medium.ends[other].mac {
            return Err(TransportError::PeerUnavailable);
        }

        let delivered = medium.deliver;
        if delivered {
            let mut buf = heapless::Vec::new();
            buf.extend_from_slice(payload)
                .map_err(|()| TransportError::PayloadTooLarge)?;
            let packet = RawPacket {
                src: medium.ends[self.side].mac,
                payload: buf,
                rssi: medium.rssi,
            };
            medium.ends[other].inbox.push_back(packet);
        }

        let deferred = medium.deferred_ack;
        let end = &mut medium.ends[self.side];
        if deferred {
            end.pending.push(delivered);
        } else if delivered {
            end.counters.sent_ok += 1;
        } else {
            end.counters.sent_fail += 1;
        }
        Ok(())
    }

    fn recv(&mut self) -> Option<RawPacket> {
        self.medium.borrow_mut().ends[self.side].inbox.pop_front()
    }

    fn counters(&self) -> SendCounters {
        self.medium.borrow().ends[self.side].counters
    }
}
