use alloc::{vec, vec::Vec};

use super::{ValidationError, WireField};
use crate::{cursor::PacketCursor, decode::DecodeErrorKind, encode::EncodeError, scancode::Key};

/// A fixed-length array of key bindings, one byte per slot.
///
/// Decoding never fails because of an unrecognised byte. Such slots become
/// [`Key::Unknown`] and encode back to the byte they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyArraySetting {
    keys: Vec<Key>,
}

impl KeyArraySetting {
    /// Creates an array of `len` unbound keys.
    pub fn new(len: usize) -> Self {
        Self {
            keys: vec![Key::NONE; len],
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Replaces every slot. `keys` must have exactly [`len`](Self::len) entries.
    pub fn set(&mut self, keys: &[Key]) -> Result<(), ValidationError> {
        if keys.len() != self.keys.len() {
            return Err(ValidationError::WrongLength {
                expected: self.keys.len(),
                found: keys.len(),
            });
        }

        self.keys.copy_from_slice(keys);
        Ok(())
    }

    pub fn set_key(&mut self, slot: usize, key: Key) -> Result<(), ValidationError> {
        let len = self.keys.len();
        let entry = self
            .keys
            .get_mut(slot)
            .ok_or(ValidationError::SlotOutOfRange { slot, len })?;

        *entry = key;
        Ok(())
    }

    /// Slots holding a byte missing from the scancode table.
    pub fn unresolved(&self) -> impl Iterator<Item = DecodeErrorKind> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(slot, key)| match key {
                Key::Unknown(value) => Some(DecodeErrorKind::UnknownKey {
                    slot,
                    value: *value,
                }),
                Key::Known(_) => None,
            })
    }
}

impl WireField for KeyArraySetting {
    fn width(&self) -> usize {
        self.keys.len()
    }

    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        let raw = cursor.read_bytes(self.keys.len())?;
        for (key, &byte) in self.keys.iter_mut().zip(raw) {
            *key = Key::from_raw(byte);
        }

        Ok(())
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        for key in &self.keys {
            cursor.write_byte(key.raw())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::KeyArraySetting;
    use crate::{
        cursor::PacketCursor,
        decode::DecodeErrorKind,
        scancode::{Key, Scancode},
        setting::{ValidationError, WireField},
    };

    #[test]
    fn unknown_byte_is_absorbed() {
        let mut pin = KeyArraySetting::new(4);
        pin.decode(&mut PacketCursor::new([0x1E, 0x1F, 0x20, 0xF5].as_slice()))
            .unwrap();

        assert_eq!(pin.keys()[0], Key::Known(Scancode::from_name("1").unwrap()));
        assert_eq!(pin.keys()[1], Key::Known(Scancode::from_name("2").unwrap()));
        assert_eq!(pin.keys()[2], Key::Known(Scancode::from_name("3").unwrap()));
        assert_eq!(pin.keys()[3], Key::Unknown(0xF5));
        assert_eq!(
            pin.unresolved().collect::<Vec<_>>(),
            [DecodeErrorKind::UnknownKey {
                slot: 3,
                value: 0xF5
            }]
        );

        let mut out = PacketCursor::new([0u8; 4]);
        pin.encode(&mut out).unwrap();
        assert_eq!(out.into_inner(), [0x1E, 0x1F, 0x20, 0xF5]);
    }

    #[test]
    fn length_is_fixed() {
        let mut pin = KeyArraySetting::new(4);

        assert_eq!(
            pin.set(&[Key::NONE; 3]),
            Err(ValidationError::WrongLength {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            pin.set_key(4, Key::NONE),
            Err(ValidationError::SlotOutOfRange { slot: 4, len: 4 })
        );
        assert_eq!(pin.width(), 4);
    }
}
