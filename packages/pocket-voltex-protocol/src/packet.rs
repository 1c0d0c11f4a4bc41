//! Fixed-size configuration packets.

use core::fmt;

/// Every packet exchanged with the device is exactly this many bytes.
pub const PACKET_SIZE: usize = 64;

/// Configuration command opcodes.
///
/// The opcode is always the first byte of a [`Packet`].
pub mod cmds {
    /// Request the settings packet. The reply echoes the opcode followed by
    /// the schema fields.
    pub const GETCONFIG: u8 = 1;
    /// Overwrite the device settings with the schema fields that follow.
    pub const SETCONFIG: u8 = 2;
    /// Request the firmware version. The reply carries a `u16` at offset 1.
    pub const VERSION: u8 = 3;
    /// Reboot into the bootloader. There is no reply.
    pub const RESET: u8 = 42;

    /// Human-readable opcode name, for logs and errors.
    pub const fn name(cmd: u8) -> &'static str {
        match cmd {
            GETCONFIG => "GETCONFIG",
            SETCONFIG => "SETCONFIG",
            VERSION => "VERSION",
            RESET => "RESET",
            _ => "UNKNOWN",
        }
    }
}

/// A [`PACKET_SIZE`] byte configuration packet.
///
/// # Encoding
///
/// | Field     | Size | Description |
/// |-----------|------|-------------|
/// | `cmd`     | 1    | A [command opcode](cmds). |
/// | `payload` | 63   | Command-specific data, zero padded. |
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet([u8; PACKET_SIZE]);

impl Packet {
    /// Creates a zero-padded packet carrying only a command opcode.
    pub const fn command(cmd: u8) -> Self {
        let mut bytes = [0; PACKET_SIZE];
        bytes[0] = cmd;
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; PACKET_SIZE]) -> Self {
        Self(bytes)
    }

    /// The command opcode in the first byte.
    pub const fn cmd(&self) -> u8 {
        self.0[0]
    }

    /// Everything after the command opcode.
    pub fn payload(&self) -> &[u8] {
        &self.0[1..]
    }

    pub const fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.0
    }

    pub const fn into_bytes(self) -> [u8; PACKET_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PACKET_SIZE]> for Packet {
    fn from(bytes: [u8; PACKET_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("cmd", &cmds::name(self.cmd()))
            .field("payload", &format_args!("{:02x?}", self.payload()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{PACKET_SIZE, Packet, cmds};

    #[test]
    fn command_packet_is_zero_padded() {
        let packet = Packet::command(cmds::VERSION);

        assert_eq!(packet.cmd(), cmds::VERSION);
        assert_eq!(packet.payload().len(), PACKET_SIZE - 1);
        assert!(packet.payload().iter().all(|&b| b == 0));
    }

    #[test]
    fn opcode_names() {
        assert_eq!(cmds::name(cmds::RESET), "RESET");
        assert_eq!(cmds::name(0x99), "UNKNOWN");
    }
}
