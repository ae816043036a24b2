//! Application core: pure domain logic, zero I/O.
//!
//! Both nodes' control loops live here: [`remote::TransmitterSession`] for
//! the handheld and [`camera::CameraService`] for the receiver.  All
//! interaction with hardware happens through the **port traits** in
//! [`ports`], so everything in this layer runs against mocks on the host.

pub mod camera;
pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod remote;
