use super::WireField;
use crate::{cursor::PacketCursor, decode::DecodeErrorKind, encode::EncodeError};

/// A one byte on/off flag.
///
/// Any non-zero byte reads as `true`. The raw byte is kept so an unusual
/// value from the device encodes back unchanged until it is overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolSetting {
    raw: u8,
}

impl BoolSetting {
    pub const fn new(value: bool) -> Self {
        Self { raw: value as u8 }
    }

    pub const fn get(&self) -> bool {
        self.raw != 0
    }

    pub fn set(&mut self, value: bool) {
        self.raw = value.into();
    }

    pub const fn raw(&self) -> u8 {
        self.raw
    }
}

impl WireField for BoolSetting {
    fn width(&self) -> usize {
        1
    }

    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        self.raw = cursor.read_byte()?;
        Ok(())
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        cursor.write_byte(self.raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BoolSetting;
    use crate::{cursor::PacketCursor, setting::WireField};

    #[test]
    fn nonzero_is_true_and_round_trips() {
        let mut setting = BoolSetting::default();
        setting.decode(&mut PacketCursor::new([0x05].as_slice())).unwrap();
        assert!(setting.get());

        let mut out = PacketCursor::new([0u8; 1]);
        setting.encode(&mut out).unwrap();
        assert_eq!(out.into_inner(), [0x05]);

        setting.set(true);
        assert_eq!(setting.raw(), 1);
        setting.set(false);
        assert_eq!(setting.raw(), 0);
    }
}
