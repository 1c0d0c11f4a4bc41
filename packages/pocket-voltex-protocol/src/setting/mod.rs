//! Typed setting variants.
//!
//! Every field of the settings packet is one of a closed set of variants
//! ([`Variant`]). Each variant owns a constant number of consecutive bytes
//! and knows how to decode, encode and validate them.

use alloc::{sync::Arc, vec::Vec};
use core::fmt;

use thiserror::Error;

use crate::{
    cursor::PacketCursor,
    decode::DecodeErrorKind,
    encode::EncodeError,
    scancode::Key,
    schema::{SettingDescriptor, SettingId},
};

mod boolean;
mod keys;
mod macros;
mod radio;
mod rgb;

pub use boolean::BoolSetting;
pub use keys::KeyArraySetting;
pub use macros::MacroSetting;
pub use radio::{RadioOption, RadioSetting};
pub use rgb::{ParseRgbError, Rgb, RgbSetting};

/// Callback invoked after a setting has been successfully changed.
pub type Observer = Arc<dyn Fn(SettingId) + Send + Sync>;

/// A field with a fixed wire width.
pub trait WireField {
    /// Number of bytes this field occupies. Constant for the lifetime of the
    /// field.
    fn width(&self) -> usize;

    /// Consumes [`width`](Self::width) bytes from `cursor` and stores them.
    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind>;

    /// Writes exactly [`width`](Self::width) bytes to `cursor`.
    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError>;
}

/// A value was rejected by a setting.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{value} is not one of the allowed choices.")]
    InvalidEnumValue { value: u8 },

    #[error("Expected a {expected} value, found a {found} value.")]
    KindMismatch {
        expected: VariantKind,
        found: VariantKind,
    },

    #[error("Expected exactly {expected} bytes, found {found}.")]
    WrongLength { expected: usize, found: usize },

    #[error("Slot {slot} is out of range for a {len} key array.")]
    SlotOutOfRange { slot: usize, len: usize },
}

/// The kind of a setting, without its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Boolean,
    Rgb,
    Radio,
    KeyArray,
    Macro,
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Rgb => "RGB",
            Self::Radio => "radio",
            Self::KeyArray => "key array",
            Self::Macro => "macro",
        })
    }
}

/// A typed setting value, used to read or assign any variant uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Rgb(Rgb),
    Choice(u8),
    Keys(Vec<Key>),
    Macro(Vec<u8>),
}

impl Value {
    pub const fn kind(&self) -> VariantKind {
        match self {
            Self::Bool(_) => VariantKind::Boolean,
            Self::Rgb(_) => VariantKind::Rgb,
            Self::Choice(_) => VariantKind::Radio,
            Self::Keys(_) => VariantKind::KeyArray,
            Self::Macro(_) => VariantKind::Macro,
        }
    }
}

/// The state of one setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    Boolean(BoolSetting),
    Rgb(RgbSetting),
    Radio(RadioSetting),
    KeyArray(KeyArraySetting),
    Macro(MacroSetting),
}

impl Variant {
    pub const fn kind(&self) -> VariantKind {
        match self {
            Self::Boolean(_) => VariantKind::Boolean,
            Self::Rgb(_) => VariantKind::Rgb,
            Self::Radio(_) => VariantKind::Radio,
            Self::KeyArray(_) => VariantKind::KeyArray,
            Self::Macro(_) => VariantKind::Macro,
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Self::Boolean(setting) => Value::Bool(setting.get()),
            Self::Rgb(setting) => Value::Rgb(setting.get()),
            Self::Radio(setting) => Value::Choice(setting.get()),
            Self::KeyArray(setting) => Value::Keys(setting.keys().to_vec()),
            Self::Macro(setting) => Value::Macro(setting.bytes().to_vec()),
        }
    }

    pub fn set_value(&mut self, value: Value) -> Result<(), ValidationError> {
        match (self, value) {
            (Self::Boolean(setting), Value::Bool(v)) => setting.set(v),
            (Self::Rgb(setting), Value::Rgb(v)) => setting.set(v),
            (Self::Radio(setting), Value::Choice(v)) => setting.set(v)?,
            (Self::KeyArray(setting), Value::Keys(v)) => setting.set(&v)?,
            (Self::Macro(setting), Value::Macro(v)) => setting.set(&v)?,
            (variant, value) => {
                return Err(ValidationError::KindMismatch {
                    expected: variant.kind(),
                    found: value.kind(),
                });
            }
        }

        Ok(())
    }
}

impl WireField for Variant {
    fn width(&self) -> usize {
        match self {
            Self::Boolean(setting) => setting.width(),
            Self::Rgb(setting) => setting.width(),
            Self::Radio(setting) => setting.width(),
            Self::KeyArray(setting) => setting.width(),
            Self::Macro(setting) => setting.width(),
        }
    }

    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        match self {
            Self::Boolean(setting) => setting.decode(cursor),
            Self::Rgb(setting) => setting.decode(cursor),
            Self::Radio(setting) => setting.decode(cursor),
            Self::KeyArray(setting) => setting.decode(cursor),
            Self::Macro(setting) => setting.decode(cursor),
        }
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        match self {
            Self::Boolean(setting) => setting.encode(cursor),
            Self::Rgb(setting) => setting.encode(cursor),
            Self::Radio(setting) => setting.encode(cursor),
            Self::KeyArray(setting) => setting.encode(cursor),
            Self::Macro(setting) => setting.encode(cursor),
        }
    }
}

/// A named setting together with its change observer.
///
/// All mutation goes through methods that fire the observer synchronously,
/// exactly once, after the change succeeds. A rejected change leaves both the
/// value and the observer untouched.
#[derive(Clone)]
pub struct Setting {
    id: SettingId,
    variant: Variant,
    observer: Option<Observer>,
}

impl Setting {
    pub fn new(id: SettingId) -> Self {
        Self {
            id,
            variant: id.descriptor().instantiate(),
            observer: None,
        }
    }

    pub const fn id(&self) -> SettingId {
        self.id
    }

    pub fn descriptor(&self) -> &'static SettingDescriptor {
        self.id.descriptor()
    }

    pub const fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn value(&self) -> Value {
        self.variant.value()
    }

    /// Registers the change observer, replacing any previous one.
    pub fn on_change(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn set_value(&mut self, value: Value) -> Result<(), ValidationError> {
        self.mutate(|variant| variant.set_value(value))
    }

    /// Sets an RGB setting from signed channels, clamping each into
    /// `0..=max`.
    pub fn set_channels(&mut self, r: i32, g: i32, b: i32) -> Result<(), ValidationError> {
        self.mutate(|variant| match variant {
            Variant::Rgb(setting) => {
                setting.set_channels(r, g, b);
                Ok(())
            }
            other => Err(ValidationError::KindMismatch {
                expected: other.kind(),
                found: VariantKind::Rgb,
            }),
        })
    }

    /// Rebinds one slot of a key array setting.
    pub fn set_key(&mut self, slot: usize, key: Key) -> Result<(), ValidationError> {
        self.mutate(|variant| match variant {
            Variant::KeyArray(setting) => setting.set_key(slot, key),
            other => Err(ValidationError::KindMismatch {
                expected: other.kind(),
                found: VariantKind::KeyArray,
            }),
        })
    }

    /// Puts back a previously saved variant without notifying the observer.
    pub(crate) fn restore(&mut self, variant: Variant) {
        self.variant = variant;
    }

    fn mutate(
        &mut self,
        change: impl FnOnce(&mut Variant) -> Result<(), ValidationError>,
    ) -> Result<(), ValidationError> {
        change(&mut self.variant)?;

        if let Some(observer) = &self.observer {
            observer(self.id);
        }

        Ok(())
    }
}

/// Mutable access to the value of a [`Setting`], without access to its
/// observer.
pub struct SettingEdit<'a> {
    setting: &'a mut Setting,
}

impl<'a> SettingEdit<'a> {
    pub(crate) fn new(setting: &'a mut Setting) -> Self {
        Self { setting }
    }

    pub fn id(&self) -> SettingId {
        self.setting.id()
    }

    pub fn value(&self) -> Value {
        self.setting.value()
    }

    pub fn set_value(&mut self, value: Value) -> Result<(), ValidationError> {
        self.setting.set_value(value)
    }

    pub fn set_channels(&mut self, r: i32, g: i32, b: i32) -> Result<(), ValidationError> {
        self.setting.set_channels(r, g, b)
    }

    pub fn set_key(&mut self, slot: usize, key: Key) -> Result<(), ValidationError> {
        self.setting.set_key(slot, key)
    }
}

impl WireField for Setting {
    fn width(&self) -> usize {
        self.variant.width()
    }

    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        self.variant.decode(cursor)
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        self.variant.encode(cursor)
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("id", &self.id)
            .field("variant", &self.variant)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::{Rgb, Setting, ValidationError, Value, VariantKind};
    use crate::schema::SettingId;

    fn counting(setting: &mut Setting) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let observed = count.clone();
        setting.on_change(Arc::new(move |_: SettingId| {
            observed.fetch_add(1, Ordering::SeqCst);
        }));
        count
    }

    #[test]
    fn observer_fires_once_per_successful_change() {
        let mut setting = Setting::new(SettingId::LightsOn);
        let count = counting(&mut setting);

        setting.set_value(Value::Bool(false)).unwrap();
        setting.set_value(Value::Bool(true)).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn rejected_change_is_silent() {
        let mut setting = Setting::new(SettingId::LightPattern);
        let count = counting(&mut setting);
        let before = setting.value();

        assert_eq!(
            setting.set_value(Value::Choice(9)),
            Err(ValidationError::InvalidEnumValue { value: 9 })
        );
        assert_eq!(setting.value(), before);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn registration_replaces_observer() {
        let mut setting = Setting::new(SettingId::HidLights);
        let first = counting(&mut setting);
        let second = counting(&mut setting);

        setting.set_value(Value::Bool(true)).unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn kind_mismatch() {
        let mut setting = Setting::new(SettingId::BtColour);

        assert_eq!(
            setting.set_value(Value::Bool(true)),
            Err(ValidationError::KindMismatch {
                expected: VariantKind::Rgb,
                found: VariantKind::Boolean,
            })
        );
        assert!(setting.set_key(0, crate::Key::NONE).is_err());
        setting.set_value(Value::Rgb(Rgb::new(1, 2, 3))).unwrap();
    }

    #[test]
    fn signed_channels_clamp() {
        let mut setting = Setting::new(SettingId::KnobL);
        setting.set_channels(300, -5, 64).unwrap();

        assert_eq!(setting.value(), Value::Rgb(Rgb::new(127, 0, 64)));
    }
}
