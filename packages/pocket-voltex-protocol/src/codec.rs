//! Whole-packet settings codec.

use alloc::{sync::Arc, vec, vec::Vec};
use core::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    cursor::PacketCursor,
    decode::DecodeError,
    encode::EncodeError,
    packet::{PACKET_SIZE, Packet, cmds},
    schema::{SCHEMA_WIDTH, SettingId},
    setting::{Observer, Setting, SettingEdit, ValidationError, Value, Variant, WireField},
};

/// Callback receiving the freshly encoded packet after a settings change.
pub type PacketObserver = Arc<dyn Fn(&Packet) + Send + Sync>;

/// Bytes following the schema in a full packet.
const TAIL_WIDTH: usize = PACKET_SIZE - 1 - SCHEMA_WIDTH;

/// Holds one instance of every setting and converts them to and from a
/// settings packet.
///
/// Fields are always decoded and encoded in [`SCHEMA`](crate::schema::SCHEMA)
/// order. Bytes after the schema are carried over from the last decoded
/// packet, so decoding and immediately re-encoding reproduces the payload
/// exactly.
pub struct SettingsCodec {
    settings: Vec<Setting>,
    tail: Vec<u8>,
    ready: bool,
    dirty: Arc<AtomicBool>,
    observer: Option<PacketObserver>,
}

impl SettingsCodec {
    /// Creates a codec holding default values. It is not [ready](Self::is_ready)
    /// until a packet has been decoded.
    pub fn new() -> Self {
        let dirty = Arc::new(AtomicBool::new(false));
        let settings = SettingId::ALL
            .into_iter()
            .map(|id| {
                let mut setting = Setting::new(id);
                setting.on_change(dirty_observer(&dirty));
                setting
            })
            .collect();

        Self {
            settings,
            tail: vec![0; TAIL_WIDTH],
            ready: false,
            dirty,
            observer: None,
        }
    }

    /// Returns `true` once every setting has been populated by a decode.
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn setting(&self, id: SettingId) -> &Setting {
        &self.settings[id.index()]
    }

    /// Every setting, in schema order.
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn value(&self, id: SettingId) -> Value {
        self.setting(id).value()
    }

    /// Decodes a GETCONFIG reply.
    ///
    /// The leading command byte is skipped. Decoding stops at the first
    /// failing field and leaves every setting as it was; on success all
    /// settings are replaced at once. Unknown scancodes in key arrays do not
    /// fail the decode, see [`unresolved_keys`](Self::unresolved_keys).
    ///
    /// Observers are not notified.
    pub fn decode(&mut self, packet: &[u8]) -> Result<(), DecodeError> {
        let mut cursor = PacketCursor::new(packet);
        let _cmd = cursor.read_byte()?;

        let mut decoded = self.settings.clone();
        for setting in &mut decoded {
            setting
                .decode(&mut cursor)
                .map_err(|kind| DecodeError::new(kind).in_setting(setting.id()))?;
        }

        // Short replies that still cover the schema are zero padded.
        let mut tail = vec![0; TAIL_WIDTH];
        let available = cursor.remaining().min(TAIL_WIDTH);
        tail[..available].copy_from_slice(cursor.read_bytes(available)?);

        self.settings = decoded;
        self.tail = tail;
        self.ready = true;

        Ok(())
    }

    /// Encodes every setting into a SETCONFIG packet.
    ///
    /// # Panics
    ///
    /// Never in practice: the schema is checked at compile time to fit in a
    /// packet, and every setting keeps a constant width.
    pub fn encode(&self) -> Packet {
        self.try_encode()
            .expect("settings schema always fits in a single packet")
    }

    fn try_encode(&self) -> Result<Packet, EncodeError> {
        let mut cursor = PacketCursor::new([0; PACKET_SIZE]);
        cursor.write_byte(cmds::SETCONFIG)?;

        for setting in &self.settings {
            setting.encode(&mut cursor)?;
        }
        cursor.write_bytes(&self.tail)?;

        Ok(Packet::from_bytes(cursor.into_inner()))
    }

    /// Registers the observer invoked with a re-encoded packet after each
    /// successful change, replacing any previous one.
    pub fn register_change_observer(&mut self, observer: impl Fn(&Packet) + Send + Sync + 'static) {
        self.dirty.store(false, Ordering::Release);
        self.observer = Some(Arc::new(observer));
    }

    pub fn clear_change_observer(&mut self) {
        self.observer = None;
    }

    /// Assigns a value to one setting.
    pub fn set_value(&mut self, id: SettingId, value: Value) -> Result<(), ValidationError> {
        self.update(id, |setting| setting.set_value(value))
    }

    /// Applies any number of changes to one setting, notifying the observer
    /// once afterwards if anything changed.
    ///
    /// If `change` fails, the setting is restored to its value before the
    /// call and the observer is not notified.
    pub fn update<R>(
        &mut self,
        id: SettingId,
        change: impl FnOnce(&mut SettingEdit<'_>) -> Result<R, ValidationError>,
    ) -> Result<R, ValidationError> {
        let setting = &mut self.settings[id.index()];
        let saved = setting.variant().clone();

        let result = change(&mut SettingEdit::new(setting));
        if result.is_err() {
            setting.restore(saved);
            self.dirty.store(false, Ordering::Release);
            return result;
        }

        if self.dirty.swap(false, Ordering::AcqRel) {
            if let Some(observer) = &self.observer {
                observer(&self.encode());
            }
        }

        result
    }

    /// Key slots that held a byte missing from the scancode table, as
    /// recoverable decode errors.
    pub fn unresolved_keys(&self) -> impl Iterator<Item = DecodeError> + '_ {
        self.settings.iter().flat_map(|setting| {
            let keys = match setting.variant() {
                Variant::KeyArray(keys) => Some(keys),
                _ => None,
            };

            keys.into_iter()
                .flat_map(|keys| keys.unresolved())
                .map(move |kind| DecodeError::new(kind).in_setting(setting.id()))
        })
    }
}

impl Default for SettingsCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SettingsCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsCodec")
            .field("settings", &self.settings)
            .field("tail", &self.tail)
            .field("ready", &self.ready)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

fn dirty_observer(dirty: &Arc<AtomicBool>) -> Observer {
    let dirty = dirty.clone();
    Arc::new(move |_: SettingId| dirty.store(true, Ordering::Release))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::SettingsCodec;
    use crate::{
        Key,
        decode::{DecodeError, DecodeErrorKind},
        packet::{PACKET_SIZE, Packet, cmds},
        schema::SettingId,
        setting::{Rgb, ValidationError, Value},
    };

    const LIGHT_PATTERN: usize = 28;
    const MACRO_PIN: usize = 31;
    const JOYSTICK_MODE: usize = 35;

    fn sample() -> [u8; PACKET_SIZE] {
        let mut bytes = [0; PACKET_SIZE];
        bytes[0] = cmds::GETCONFIG;
        bytes[1..36].copy_from_slice(&[
            0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x28, 0x00, // switches
            10, 20, 30, // bt
            40, 50, 60, // fx
            127, 0, 127, // breathe
            1, 2, 3, // knob l
            4, 5, 6, // knob r
            1, 0, 1, 1, // lights
            2, // pattern
            0x11, 0x22, // macros
            0x1E, 0x1F, 0x20, 0x21, // pin
            1, // joystick
        ]);
        bytes[40] = 0xAB;
        bytes
    }

    fn recording(codec: &mut SettingsCodec) -> Arc<Mutex<Vec<Packet>>> {
        let packets = Arc::new(Mutex::new(Vec::new()));
        let sink = packets.clone();
        codec.register_change_observer(move |packet| sink.lock().unwrap().push(*packet));
        packets
    }

    #[test]
    fn round_trip_only_changes_command() {
        let bytes = sample();
        let mut codec = SettingsCodec::new();
        codec.decode(&bytes).unwrap();

        let packet = codec.encode();
        assert_eq!(packet.cmd(), cmds::SETCONFIG);
        assert_eq!(packet.payload(), &bytes[1..]);
    }

    #[test]
    fn decodes_typed_values() {
        let mut codec = SettingsCodec::new();
        assert!(!codec.is_ready());
        codec.decode(&sample()).unwrap();

        assert!(codec.is_ready());
        assert_eq!(codec.value(SettingId::BtColour), Value::Rgb(Rgb::new(10, 20, 30)));
        assert_eq!(codec.value(SettingId::HidLights), Value::Bool(false));
        assert_eq!(codec.value(SettingId::LightPattern), Value::Choice(2));
        assert_eq!(codec.value(SettingId::MacroHold), Value::Macro(vec![0x22]));
        assert_eq!(codec.value(SettingId::JoystickMode), Value::Choice(1));
        assert_eq!(codec.unresolved_keys().count(), 0);
    }

    #[test]
    fn unknown_pin_key_is_kept() {
        let mut bytes = sample();
        bytes[MACRO_PIN + 3] = 0x01;

        let mut codec = SettingsCodec::new();
        codec.decode(&bytes).unwrap();

        assert_eq!(
            codec.value(SettingId::MacroPin),
            Value::Keys(vec![
                Key::from_raw(0x1E),
                Key::from_raw(0x1F),
                Key::from_raw(0x20),
                Key::Unknown(0x01),
            ])
        );
        assert_eq!(
            codec.unresolved_keys().collect::<Vec<_>>(),
            [DecodeError::new(DecodeErrorKind::UnknownKey { slot: 3, value: 0x01 })
                .in_setting(SettingId::MacroPin)]
        );
        assert_eq!(codec.encode().payload(), &bytes[1..]);
    }

    #[test]
    fn invalid_radio_fails_whole_decode() {
        let mut bytes = sample();
        bytes[LIGHT_PATTERN] = 9;

        let mut codec = SettingsCodec::new();
        let err = codec.decode(&bytes).unwrap_err();

        assert_eq!(err.setting(), Some(SettingId::LightPattern));
        assert_eq!(
            err.kind(),
            DecodeErrorKind::Validation(ValidationError::InvalidEnumValue { value: 9 })
        );
        assert!(!codec.is_ready());
        assert_eq!(codec.value(SettingId::BtColour), Value::Rgb(Rgb::default()));
    }

    #[test]
    fn short_packet_is_out_of_bounds() {
        let bytes = sample();
        let mut codec = SettingsCodec::new();
        let err = codec.decode(&bytes[..20]).unwrap_err();

        assert!(matches!(err.kind(), DecodeErrorKind::OutOfBounds(_)));
        assert!(!err.is_recoverable());
        assert!(!codec.is_ready());
    }

    #[test]
    fn observer_receives_one_packet_per_change() {
        let mut codec = SettingsCodec::new();
        codec.decode(&sample()).unwrap();
        let packets = recording(&mut codec);

        codec
            .set_value(SettingId::LightPattern, Value::Choice(4))
            .unwrap();
        assert_eq!(
            codec.set_value(SettingId::LightPattern, Value::Choice(9)),
            Err(ValidationError::InvalidEnumValue { value: 9 })
        );
        codec
            .update(SettingId::KnobR, |setting| {
                setting.set_channels(300, -5, 64)?;
                setting.set_channels(1, 1, 1)
            })
            .unwrap();

        let packets = packets.lock().unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].cmd(), cmds::SETCONFIG);
        assert_eq!(packets[0].as_bytes()[LIGHT_PATTERN], 4);
        assert_eq!(packets[1].as_bytes()[21..24], [1, 1, 1]);
        assert_eq!(codec.value(SettingId::LightPattern), Value::Choice(4));
    }

    #[test]
    fn failed_update_restores_setting() {
        let mut codec = SettingsCodec::new();
        codec.decode(&sample()).unwrap();
        let packets = recording(&mut codec);

        let result = codec.update(SettingId::BtColour, |setting| {
            setting.set_channels(1, 2, 3)?;
            setting.set_key(0, Key::NONE)
        });

        assert!(matches!(result, Err(ValidationError::KindMismatch { .. })));
        assert_eq!(codec.value(SettingId::BtColour), Value::Rgb(Rgb::new(10, 20, 30)));
        assert!(packets.lock().unwrap().is_empty());

        codec
            .set_value(SettingId::LightsOn, Value::Bool(false))
            .unwrap();
        let packets = packets.lock().unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].as_bytes()[9..12], [10, 20, 30]);
    }

    #[test]
    fn decode_is_silent() {
        let mut codec = SettingsCodec::new();
        let packets = recording(&mut codec);
        codec.decode(&sample()).unwrap();

        assert!(packets.lock().unwrap().is_empty());
    }

    #[test]
    fn encode_order_ignores_mutation_order() {
        let mut codec = SettingsCodec::new();
        codec.decode(&sample()).unwrap();

        codec
            .set_value(SettingId::JoystickMode, Value::Choice(0))
            .unwrap();
        codec
            .set_value(SettingId::BtColour, Value::Rgb(Rgb::new(200, 0, 5)))
            .unwrap();
        codec
            .update(SettingId::Switches, |setting| setting.set_key(7, Key::from_raw(0x2C)))
            .unwrap();

        let bytes = codec.encode().into_bytes();
        assert_eq!(bytes[8], 0x2C);
        assert_eq!(bytes[9..12], [127, 0, 5]);
        assert_eq!(bytes[JOYSTICK_MODE], 0);
        assert_eq!(bytes[40], 0xAB);
    }
}
