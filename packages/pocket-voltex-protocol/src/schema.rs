//! The firmware-defined settings layout.
//!
//! [`SCHEMA`] lists every setting in the exact order the firmware stores
//! them. There is no version tag in the packet, so this order must match the
//! firmware byte for byte. Inserting, removing or reordering entries silently
//! desynchronizes host and device.

use core::fmt;

use crate::{
    packet::PACKET_SIZE,
    setting::{
        BoolSetting, KeyArraySetting, MacroSetting, RadioOption, RadioSetting, RgbSetting,
        Variant, VariantKind,
    },
};

/// Upper limit of every LED colour channel.
pub const BRIGHTNESS_MAX: u8 = 127;

/// Number of bindable switches.
pub const SWITCH_COUNT: usize = 8;

/// Number of keys in the macro PIN.
pub const PIN_LENGTH: usize = 4;

/// Width of each macro payload.
pub const MACRO_WIDTH: usize = 1;

/// Identifies one setting. Discriminants follow the wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SettingId {
    Switches,
    BtColour,
    FxColour,
    BreatheColour,
    KnobL,
    KnobR,
    LightsOn,
    HidLights,
    KeyLights,
    KnobLights,
    LightPattern,
    MacroClick,
    MacroHold,
    MacroPin,
    JoystickMode,
}

impl SettingId {
    /// Every setting, in wire order.
    pub const ALL: [SettingId; 15] = [
        Self::Switches,
        Self::BtColour,
        Self::FxColour,
        Self::BreatheColour,
        Self::KnobL,
        Self::KnobR,
        Self::LightsOn,
        Self::HidLights,
        Self::KeyLights,
        Self::KnobLights,
        Self::LightPattern,
        Self::MacroClick,
        Self::MacroHold,
        Self::MacroPin,
        Self::JoystickMode,
    ];

    /// Position of this setting in the wire order.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static SettingDescriptor {
        &SCHEMA[self.index()]
    }

    /// Stable snake_case identifier.
    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    /// Looks up a setting by its [`key`](Self::key).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static description of one setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub id: SettingId,
    /// Stable snake_case identifier.
    pub key: &'static str,
    /// Label shown to users.
    pub name: &'static str,
    pub kind: VariantKind,
    /// Bytes occupied on the wire.
    pub width: usize,
    /// Allowed choices for radio settings.
    pub options: &'static [RadioOption],
    /// Per-slot labels for key arrays.
    pub labels: &'static [&'static str],
    /// The setting this one is nested under in a settings UI.
    pub parent: Option<SettingId>,
}

impl SettingDescriptor {
    const fn new(id: SettingId, key: &'static str, name: &'static str, kind: VariantKind) -> Self {
        let width = match kind {
            VariantKind::Boolean | VariantKind::Radio => 1,
            VariantKind::Rgb => 3,
            VariantKind::KeyArray | VariantKind::Macro => 0,
        };

        Self {
            id,
            key,
            name,
            kind,
            width,
            options: &[],
            labels: &[],
            parent: None,
        }
    }

    const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    const fn options(mut self, options: &'static [RadioOption]) -> Self {
        self.options = options;
        self
    }

    const fn labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    const fn parent(mut self, parent: SettingId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Creates a fresh, default-valued variant for this descriptor.
    pub fn instantiate(&self) -> Variant {
        match self.kind {
            VariantKind::Boolean => Variant::Boolean(BoolSetting::default()),
            VariantKind::Rgb => Variant::Rgb(RgbSetting::new(BRIGHTNESS_MAX)),
            VariantKind::Radio => Variant::Radio(RadioSetting::new(self.options)),
            VariantKind::KeyArray => Variant::KeyArray(KeyArraySetting::new(self.width)),
            VariantKind::Macro => Variant::Macro(MacroSetting::new(self.width)),
        }
    }
}

pub const LIGHT_PATTERNS: &[RadioOption] = &[
    RadioOption { value: 1, name: "None" },
    RadioOption { value: 2, name: "Solid" },
    RadioOption { value: 4, name: "Breathe" },
    RadioOption { value: 3, name: "Follower" },
];

pub const INPUT_MODES: &[RadioOption] = &[
    RadioOption { value: 0, name: "Keyboard/Mouse" },
    RadioOption { value: 1, name: "Joystick" },
];

pub const SWITCH_LABELS: &[&str] = &["BT-A", "BT-B", "BT-C", "BT-D", "FX-L", "FX-R", "START"];

use SettingId as Id;
use VariantKind as Kind;

const DESCRIPTORS: [SettingDescriptor; 15] = [
    SettingDescriptor::new(Id::Switches, "switches", "Keyboard bindings", Kind::KeyArray)
        .width(SWITCH_COUNT)
        .labels(SWITCH_LABELS),
    SettingDescriptor::new(Id::BtColour, "bt_colour", "BT colour", Kind::Rgb)
        .parent(Id::KeyLights),
    SettingDescriptor::new(Id::FxColour, "fx_colour", "FX colour", Kind::Rgb)
        .parent(Id::KeyLights),
    SettingDescriptor::new(Id::BreatheColour, "breathe_colour", "Solid/Breathe colour", Kind::Rgb)
        .parent(Id::LightsOn),
    SettingDescriptor::new(Id::KnobL, "knob_l", "VOL-L colour", Kind::Rgb)
        .parent(Id::KnobLights),
    SettingDescriptor::new(Id::KnobR, "knob_r", "VOL-R colour", Kind::Rgb)
        .parent(Id::KnobLights),
    SettingDescriptor::new(Id::LightsOn, "lights_on", "Enable LEDs", Kind::Boolean),
    SettingDescriptor::new(Id::HidLights, "hid_lights", "HID lights", Kind::Boolean)
        .parent(Id::LightsOn),
    SettingDescriptor::new(Id::KeyLights, "key_lights", "Key lights", Kind::Boolean)
        .parent(Id::LightsOn),
    SettingDescriptor::new(Id::KnobLights, "knob_lights", "Knob lights", Kind::Boolean)
        .parent(Id::LightsOn),
    SettingDescriptor::new(Id::LightPattern, "light_pattern", "Lights pattern", Kind::Radio)
        .options(LIGHT_PATTERNS)
        .parent(Id::LightsOn),
    SettingDescriptor::new(Id::MacroClick, "macro_click", "Macro click", Kind::Macro)
        .width(MACRO_WIDTH),
    SettingDescriptor::new(Id::MacroHold, "macro_hold", "Macro longpress", Kind::Macro)
        .width(MACRO_WIDTH),
    SettingDescriptor::new(Id::MacroPin, "macro_pin", "Macro PIN", Kind::KeyArray)
        .width(PIN_LENGTH),
    SettingDescriptor::new(Id::JoystickMode, "joystick_mode", "Input mode", Kind::Radio)
        .options(INPUT_MODES),
];

/// Every setting, in firmware order.
pub static SCHEMA: [SettingDescriptor; 15] = DESCRIPTORS;

/// Total bytes occupied by the schema, excluding the command byte.
pub const SCHEMA_WIDTH: usize = {
    let mut width = 0;
    let mut i = 0;
    while i < DESCRIPTORS.len() {
        width += DESCRIPTORS[i].width;
        i += 1;
    }
    width
};

const _: () = assert!(1 + SCHEMA_WIDTH <= PACKET_SIZE);

const _: () = {
    let mut i = 0;
    while i < DESCRIPTORS.len() {
        assert!(DESCRIPTORS[i].id as usize == i);
        i += 1;
    }
};
