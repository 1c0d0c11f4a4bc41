use core::fmt;

use thiserror::Error;

use crate::{cursor::OutOfBounds, schema::SettingId, setting::ValidationError};

/// A failure while decoding a settings packet.
///
/// Pairs the [`DecodeErrorKind`] with the setting that was being decoded
/// when it happened, if any.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    setting: Option<SettingId>,
}

impl DecodeError {
    pub const fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            setting: None,
        }
    }

    /// Attaches the setting that was being decoded.
    pub const fn in_setting(mut self, setting: SettingId) -> Self {
        self.setting = Some(setting);
        self
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    pub const fn setting(&self) -> Option<SettingId> {
        self.setting
    }

    /// Returns `true` for anomalies that are absorbed rather than failing a
    /// whole decode.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::UnknownKey { .. })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.setting {
            Some(setting) => write!(f, "Failed to decode {setting}: {}", self.kind),
            None => write!(f, "Failed to decode settings packet: {}", self.kind),
        }
    }
}

impl From<OutOfBounds> for DecodeError {
    fn from(err: OutOfBounds) -> Self {
        Self::new(DecodeErrorKind::OutOfBounds(err))
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The packet was too short for the schema.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// A key slot held a byte with no entry in the scancode table.
    ///
    /// This is never returned from a decode; it describes slots that were
    /// kept as [`Key::Unknown`](crate::Key::Unknown).
    #[error("Slot {slot} holds unknown scancode {value:#04x}.")]
    UnknownKey { slot: usize, value: u8 },

    /// A field held a value outside its allowed set.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
