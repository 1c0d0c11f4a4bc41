//! Configuration protocol for Pocket Voltex controllers.
//!
//! The controller exposes its settings as a single fixed-size packet. This
//! crate decodes that packet into typed settings and encodes it back, without
//! performing any I/O itself.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod cursor;
pub mod scancode;
pub mod schema;
pub mod setting;

mod codec;
mod decode;
mod encode;
mod packet;
mod version;

pub use codec::{PacketObserver, SettingsCodec};
pub use cursor::{OutOfBounds, PacketCursor};
pub use decode::{DecodeError, DecodeErrorKind};
pub use encode::EncodeError;
pub use packet::{PACKET_SIZE, Packet, cmds};
pub use scancode::{Key, Scancode};
pub use schema::{SettingDescriptor, SettingId};
pub use setting::{Rgb, Setting, SettingEdit, ValidationError, Value, Variant, VariantKind};
pub use version::{DeviceMode, FirmwareVersion, bcd_subminor};

/// USB vendor id of the controller.
pub const VENDOR_ID: u16 = 0x16D0;

/// USB product id of the controller, shared by the bootloader and the
/// application firmware.
pub const PRODUCT_ID: u16 = 0x0A6D;
