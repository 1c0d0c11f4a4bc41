use alloc::{vec, vec::Vec};

use super::{ValidationError, WireField};
use crate::{cursor::PacketCursor, decode::DecodeErrorKind, encode::EncodeError};

/// An opaque macro payload, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSetting {
    bytes: Vec<u8>,
}

impl MacroSetting {
    pub fn new(width: usize) -> Self {
        Self {
            bytes: vec![0; width],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replaces the payload. `bytes` must match the macro width exactly.
    pub fn set(&mut self, bytes: &[u8]) -> Result<(), ValidationError> {
        if bytes.len() != self.bytes.len() {
            return Err(ValidationError::WrongLength {
                expected: self.bytes.len(),
                found: bytes.len(),
            });
        }

        self.bytes.copy_from_slice(bytes);
        Ok(())
    }
}

impl WireField for MacroSetting {
    fn width(&self) -> usize {
        self.bytes.len()
    }

    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        let raw = cursor.read_bytes(self.bytes.len())?;
        self.bytes.copy_from_slice(raw);
        Ok(())
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        cursor.write_bytes(&self.bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MacroSetting;
    use crate::{
        cursor::PacketCursor,
        setting::{ValidationError, WireField},
    };

    #[test]
    fn bytes_pass_through() {
        let mut setting = MacroSetting::new(1);
        setting
            .decode(&mut PacketCursor::new([0xC3, 0x00].as_slice()))
            .unwrap();
        assert_eq!(setting.bytes(), [0xC3]);

        assert_eq!(
            setting.set(&[1, 2]),
            Err(ValidationError::WrongLength {
                expected: 1,
                found: 2
            })
        );

        setting.set(&[0x07]).unwrap();
        let mut out = PacketCursor::new([0u8; 1]);
        setting.encode(&mut out).unwrap();
        assert_eq!(out.into_inner(), [0x07]);
    }
}
