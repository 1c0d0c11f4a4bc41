//! USB HID keyboard scancodes understood by the key binding settings.

use core::fmt;

/// A named USB HID keyboard/keypad usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scancode {
    value: u8,
    name: &'static str,
}

impl Scancode {
    const fn new(value: u8, name: &'static str) -> Self {
        Self { value, name }
    }

    /// Looks up a scancode by its raw usage value.
    pub fn from_value(value: u8) -> Option<Self> {
        SCANCODES
            .binary_search_by_key(&value, |code| code.value)
            .ok()
            .map(|index| SCANCODES[index])
    }

    /// Looks up a scancode by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        SCANCODES
            .iter()
            .find(|code| code.name.eq_ignore_ascii_case(name))
            .copied()
    }

    pub const fn value(&self) -> u8 {
        self.value
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Scancode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One slot of a key array.
///
/// Bytes that are missing from [`SCANCODES`] are kept as
/// [`Key::Unknown`] with their raw value, so they encode back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Known(Scancode),
    Unknown(u8),
}

impl Key {
    /// The unbound key (usage `0x00`).
    pub const NONE: Self = Self::Known(Scancode::new(0x00, "None"));

    pub fn from_raw(value: u8) -> Self {
        Scancode::from_value(value).map_or(Self::Unknown(value), Self::Known)
    }

    /// The byte this key encodes to.
    pub const fn raw(&self) -> u8 {
        match self {
            Self::Known(code) => code.value(),
            Self::Unknown(value) => *value,
        }
    }

    pub const fn scancode(&self) -> Option<Scancode> {
        match self {
            Self::Known(code) => Some(*code),
            Self::Unknown(_) => None,
        }
    }

    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Scancode> for Key {
    fn from(code: Scancode) -> Self {
        Self::Known(code)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(code) => code.fmt(f),
            Self::Unknown(value) => write!(f, "Unknown({value:#04x})"),
        }
    }
}

/// Every scancode the firmware can bind, sorted by value.
pub static SCANCODES: &[Scancode] = &[
    Scancode::new(0x00, "None"),
    Scancode::new(0x04, "A"),
    Scancode::new(0x05, "B"),
    Scancode::new(0x06, "C"),
    Scancode::new(0x07, "D"),
    Scancode::new(0x08, "E"),
    Scancode::new(0x09, "F"),
    Scancode::new(0x0A, "G"),
    Scancode::new(0x0B, "H"),
    Scancode::new(0x0C, "I"),
    Scancode::new(0x0D, "J"),
    Scancode::new(0x0E, "K"),
    Scancode::new(0x0F, "L"),
    Scancode::new(0x10, "M"),
    Scancode::new(0x11, "N"),
    Scancode::new(0x12, "O"),
    Scancode::new(0x13, "P"),
    Scancode::new(0x14, "Q"),
    Scancode::new(0x15, "R"),
    Scancode::new(0x16, "S"),
    Scancode::new(0x17, "T"),
    Scancode::new(0x18, "U"),
    Scancode::new(0x19, "V"),
    Scancode::new(0x1A, "W"),
    Scancode::new(0x1B, "X"),
    Scancode::new(0x1C, "Y"),
    Scancode::new(0x1D, "Z"),
    Scancode::new(0x1E, "1"),
    Scancode::new(0x1F, "2"),
    Scancode::new(0x20, "3"),
    Scancode::new(0x21, "4"),
    Scancode::new(0x22, "5"),
    Scancode::new(0x23, "6"),
    Scancode::new(0x24, "7"),
    Scancode::new(0x25, "8"),
    Scancode::new(0x26, "9"),
    Scancode::new(0x27, "0"),
    Scancode::new(0x28, "Enter"),
    Scancode::new(0x29, "Escape"),
    Scancode::new(0x2A, "Backspace"),
    Scancode::new(0x2B, "Tab"),
    Scancode::new(0x2C, "Space"),
    Scancode::new(0x2D, "Minus"),
    Scancode::new(0x2E, "Equal"),
    Scancode::new(0x2F, "LeftBracket"),
    Scancode::new(0x30, "RightBracket"),
    Scancode::new(0x31, "Backslash"),
    Scancode::new(0x32, "NonUsHash"),
    Scancode::new(0x33, "Semicolon"),
    Scancode::new(0x34, "Quote"),
    Scancode::new(0x35, "Grave"),
    Scancode::new(0x36, "Comma"),
    Scancode::new(0x37, "Period"),
    Scancode::new(0x38, "Slash"),
    Scancode::new(0x39, "CapsLock"),
    Scancode::new(0x3A, "F1"),
    Scancode::new(0x3B, "F2"),
    Scancode::new(0x3C, "F3"),
    Scancode::new(0x3D, "F4"),
    Scancode::new(0x3E, "F5"),
    Scancode::new(0x3F, "F6"),
    Scancode::new(0x40, "F7"),
    Scancode::new(0x41, "F8"),
    Scancode::new(0x42, "F9"),
    Scancode::new(0x43, "F10"),
    Scancode::new(0x44, "F11"),
    Scancode::new(0x45, "F12"),
    Scancode::new(0x46, "PrintScreen"),
    Scancode::new(0x47, "ScrollLock"),
    Scancode::new(0x48, "Pause"),
    Scancode::new(0x49, "Insert"),
    Scancode::new(0x4A, "Home"),
    Scancode::new(0x4B, "PageUp"),
    Scancode::new(0x4C, "Delete"),
    Scancode::new(0x4D, "End"),
    Scancode::new(0x4E, "PageDown"),
    Scancode::new(0x4F, "Right"),
    Scancode::new(0x50, "Left"),
    Scancode::new(0x51, "Down"),
    Scancode::new(0x52, "Up"),
    Scancode::new(0x53, "NumLock"),
    Scancode::new(0x54, "KpDivide"),
    Scancode::new(0x55, "KpMultiply"),
    Scancode::new(0x56, "KpMinus"),
    Scancode::new(0x57, "KpPlus"),
    Scancode::new(0x58, "KpEnter"),
    Scancode::new(0x59, "Kp1"),
    Scancode::new(0x5A, "Kp2"),
    Scancode::new(0x5B, "Kp3"),
    Scancode::new(0x5C, "Kp4"),
    Scancode::new(0x5D, "Kp5"),
    Scancode::new(0x5E, "Kp6"),
    Scancode::new(0x5F, "Kp7"),
    Scancode::new(0x60, "Kp8"),
    Scancode::new(0x61, "Kp9"),
    Scancode::new(0x62, "Kp0"),
    Scancode::new(0x63, "KpPeriod"),
    Scancode::new(0x64, "NonUsBackslash"),
    Scancode::new(0x65, "Application"),
    Scancode::new(0x66, "Power"),
    Scancode::new(0x67, "KpEqual"),
    Scancode::new(0x68, "F13"),
    Scancode::new(0x69, "F14"),
    Scancode::new(0x6A, "F15"),
    Scancode::new(0x6B, "F16"),
    Scancode::new(0x6C, "F17"),
    Scancode::new(0x6D, "F18"),
    Scancode::new(0x6E, "F19"),
    Scancode::new(0x6F, "F20"),
    Scancode::new(0x70, "F21"),
    Scancode::new(0x71, "F22"),
    Scancode::new(0x72, "F23"),
    Scancode::new(0x73, "F24"),
    Scancode::new(0x74, "Execute"),
    Scancode::new(0x75, "Help"),
    Scancode::new(0x76, "Menu"),
    Scancode::new(0x77, "Select"),
    Scancode::new(0x78, "Stop"),
    Scancode::new(0x79, "Again"),
    Scancode::new(0x7A, "Undo"),
    Scancode::new(0x7B, "Cut"),
    Scancode::new(0x7C, "Copy"),
    Scancode::new(0x7D, "Paste"),
    Scancode::new(0x7E, "Find"),
    Scancode::new(0x7F, "Mute"),
    Scancode::new(0x80, "VolumeUp"),
    Scancode::new(0x81, "VolumeDown"),
    Scancode::new(0x82, "LockingCapsLock"),
    Scancode::new(0x83, "LockingNumLock"),
    Scancode::new(0x84, "LockingScrollLock"),
    Scancode::new(0x85, "KpComma"),
    Scancode::new(0x86, "KpEqualSign"),
    Scancode::new(0x87, "International1"),
    Scancode::new(0x88, "International2"),
    Scancode::new(0x89, "International3"),
    Scancode::new(0x8A, "International4"),
    Scancode::new(0x8B, "International5"),
    Scancode::new(0x8C, "International6"),
    Scancode::new(0x8D, "International7"),
    Scancode::new(0x8E, "International8"),
    Scancode::new(0x8F, "International9"),
    Scancode::new(0x90, "Lang1"),
    Scancode::new(0x91, "Lang2"),
    Scancode::new(0x92, "Lang3"),
    Scancode::new(0x93, "Lang4"),
    Scancode::new(0x94, "Lang5"),
    Scancode::new(0x95, "Lang6"),
    Scancode::new(0x96, "Lang7"),
    Scancode::new(0x97, "Lang8"),
    Scancode::new(0x98, "Lang9"),
    Scancode::new(0x99, "AltErase"),
    Scancode::new(0x9A, "SysReq"),
    Scancode::new(0x9B, "Cancel"),
    Scancode::new(0x9C, "Clear"),
    Scancode::new(0x9D, "Prior"),
    Scancode::new(0x9E, "Return"),
    Scancode::new(0x9F, "Separator"),
    Scancode::new(0xA0, "Out"),
    Scancode::new(0xA1, "Oper"),
    Scancode::new(0xA2, "ClearAgain"),
    Scancode::new(0xA3, "CrSel"),
    Scancode::new(0xA4, "ExSel"),
    Scancode::new(0xE0, "LeftCtrl"),
    Scancode::new(0xE1, "LeftShift"),
    Scancode::new(0xE2, "LeftAlt"),
    Scancode::new(0xE3, "LeftGui"),
    Scancode::new(0xE4, "RightCtrl"),
    Scancode::new(0xE5, "RightShift"),
    Scancode::new(0xE6, "RightAlt"),
    Scancode::new(0xE7, "RightGui"),
];

#[cfg(test)]
mod tests {
    use super::{Key, SCANCODES, Scancode};

    #[test]
    fn table_is_sorted() {
        assert!(SCANCODES.windows(2).all(|w| w[0].value() < w[1].value()));
    }

    #[test]
    fn lookups() {
        let plus = Scancode::from_name("kpplus").unwrap();
        assert_eq!(plus.value(), 0x57);
        assert_eq!(Scancode::from_value(0x04).unwrap().name(), "A");
        assert_eq!(Scancode::from_value(0xE7).unwrap().name(), "RightGui");
        assert!(Scancode::from_value(0x01).is_none());
        assert!(Scancode::from_value(0xFF).is_none());
    }

    #[test]
    fn unknown_keys_keep_raw_value() {
        let key = Key::from_raw(0xF0);
        assert_eq!(key, Key::Unknown(0xF0));
        assert_eq!(key.raw(), 0xF0);
        assert!(!key.is_resolved());

        assert_eq!(Key::from_raw(0x00), Key::NONE);
    }
}
