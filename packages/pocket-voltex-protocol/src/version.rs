use core::fmt;

use crate::cursor::{OutOfBounds, PacketCursor};

/// A Pocket Voltex firmware version.
///
/// The firmware reports its version as a little-endian `u16` holding the
/// version multiplied by ten, so a raw value of `30` is version `3.0`.
///
/// This type implements `Ord`, meaning it can be compared against the
/// latest published version.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FirmwareVersion(u16);

impl FirmwareVersion {
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u16 {
        self.0
    }

    pub const fn major(&self) -> u16 {
        self.0 / 10
    }

    pub const fn minor(&self) -> u16 {
        self.0 % 10
    }

    /// Decodes the version from a VERSION reply.
    ///
    /// | Field     | Size | Description |
    /// |-----------|------|-------------|
    /// | `cmd`     | 1    | Echoed opcode, ignored. |
    /// | `version` | 2    | Raw version, little endian. |
    pub fn decode<B: AsRef<[u8]>>(cursor: &mut PacketCursor<B>) -> Result<Self, OutOfBounds> {
        let _echo = cursor.read_byte()?;
        Ok(Self(cursor.read_u16_le()?))
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

/// Which program the device is running, as advertised in the low nibble
/// ("subminor") of its USB `bcdDevice` release number.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeviceMode {
    /// The bootloader, which only accepts firmware images.
    Bootloader,
    /// The controller firmware, which speaks the configuration protocol.
    Application,
}

impl DeviceMode {
    pub const BOOTLOADER_SUBMINOR: u8 = 2;
    pub const APPLICATION_SUBMINOR: u8 = 3;

    pub const fn from_subminor(subminor: u8) -> Option<Self> {
        match subminor {
            Self::BOOTLOADER_SUBMINOR => Some(Self::Bootloader),
            Self::APPLICATION_SUBMINOR => Some(Self::Application),
            _ => None,
        }
    }
}

/// Extracts the subminor nibble from a BCD `bcdDevice` value.
pub const fn bcd_subminor(bcd_device: u16) -> u8 {
    (bcd_device & 0x0F) as u8
}

#[cfg(test)]
mod tests {
    use super::{DeviceMode, FirmwareVersion, bcd_subminor};
    use crate::{
        cursor::PacketCursor,
        packet::{Packet, cmds},
    };

    #[test]
    fn decodes_reply_at_offset_one() {
        let mut bytes = *Packet::command(cmds::VERSION).as_bytes();
        bytes[1] = 0x1E;
        bytes[2] = 0x00;

        let version = FirmwareVersion::decode(&mut PacketCursor::new(bytes)).unwrap();
        assert_eq!(version.raw(), 30);
        assert_eq!(version.to_string(), "3.0");
    }

    #[test]
    fn short_reply_is_out_of_bounds() {
        let reply = [cmds::VERSION, 0x1E];
        assert!(FirmwareVersion::decode(&mut PacketCursor::new(reply.as_slice())).is_err());
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(FirmwareVersion::from_raw(29) < FirmwareVersion::from_raw(30));
        assert_eq!(FirmwareVersion::from_raw(125).to_string(), "12.5");
    }

    #[test]
    fn mode_from_bcd_device() {
        assert_eq!(
            DeviceMode::from_subminor(bcd_subminor(0x0102)),
            Some(DeviceMode::Bootloader)
        );
        assert_eq!(
            DeviceMode::from_subminor(bcd_subminor(0x0103)),
            Some(DeviceMode::Application)
        );
        assert_eq!(DeviceMode::from_subminor(bcd_subminor(0x0105)), None);
    }
}
