//! Crate for configuring Pocket Voltex controllers over USB.
//!
//! A [`DeviceSession`] connects to a controller, checks that its firmware is
//! current, reads its settings and writes every change back to the device.
//! The USB transport and the firmware update machinery are supplied by the
//! caller through the [`Transport`], [`FirmwareInfoProvider`] and
//! [`FirmwareFlasher`] traits. A transport built on `nusb` is available with
//! the `usb` feature.

pub use pocket_voltex_protocol as protocol;

mod config;
mod error;
mod firmware;
mod session;
mod status;
mod transport;

#[cfg(feature = "usb")]
pub mod usb;

pub use config::SessionConfig;
pub use error::{ProtocolError, SessionError};
pub use firmware::{FirmwareFlasher, FirmwareInfo, FirmwareInfoProvider};
pub use session::{ConnectOutcome, DeviceSession, SessionState};
pub use status::{LogStatusSink, StatusSink};
pub use transport::{DeviceHandle, Transport};
