use super::{ValidationError, WireField};
use crate::{cursor::PacketCursor, decode::DecodeErrorKind, encode::EncodeError};

/// One choice of a [`RadioSetting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadioOption {
    pub value: u8,
    pub name: &'static str,
}

/// A one byte choice from a fixed set of codes.
///
/// Codes outside the set are rejected both when decoding and when assigning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioSetting {
    value: u8,
    options: &'static [RadioOption],
}

impl RadioSetting {
    /// Creates a radio defaulting to its first option.
    pub const fn new(options: &'static [RadioOption]) -> Self {
        let value = match options.first() {
            Some(option) => option.value,
            None => 0,
        };

        Self { value, options }
    }

    pub const fn get(&self) -> u8 {
        self.value
    }

    /// The currently selected option.
    pub fn selected(&self) -> Option<&'static RadioOption> {
        self.option(self.value)
    }

    pub const fn options(&self) -> &'static [RadioOption] {
        self.options
    }

    pub fn set(&mut self, value: u8) -> Result<(), ValidationError> {
        self.validate(value)?;
        self.value = value;
        Ok(())
    }

    fn option(&self, value: u8) -> Option<&'static RadioOption> {
        self.options.iter().find(|option| option.value == value)
    }

    fn validate(&self, value: u8) -> Result<(), ValidationError> {
        match self.option(value) {
            Some(_) => Ok(()),
            None => Err(ValidationError::InvalidEnumValue { value }),
        }
    }
}

impl WireField for RadioSetting {
    fn width(&self) -> usize {
        1
    }

    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        let value = cursor.read_byte()?;
        self.validate(value)?;
        self.value = value;
        Ok(())
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        cursor.write_byte(self.value)?;
        Ok(())
    }
}
