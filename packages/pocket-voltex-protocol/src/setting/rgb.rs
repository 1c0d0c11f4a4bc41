use core::{fmt, str::FromStr};

use thiserror::Error;

use super::WireField;
use crate::{cursor::PacketCursor, decode::DecodeErrorKind, encode::EncodeError};

/// An RGB colour as stored by the firmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from signed channels, clamping each into `0..=max`.
    pub fn from_channels(r: i32, g: i32, b: i32, max: u8) -> Self {
        let clamp = |channel: i32| channel.clamp(0, max.into()) as u8;
        Self::new(clamp(r), clamp(g), clamp(b))
    }

    /// Limits every channel to `max`.
    ///
    /// Channels are unsigned, so a byte such as `0xFB` is a bright channel
    /// and clamps to `max`. Use [`from_channels`](Self::from_channels) for
    /// values that may be negative.
    pub fn clamped(self, max: u8) -> Self {
        Self::new(self.r.min(max), self.g.min(max), self.b.min(max))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("Invalid colour, expected #RRGGBB.")]
pub struct ParseRgbError;

impl FromStr for Rgb {
    type Err = ParseRgbError;

    /// Parses `#RRGGBB` or `RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseRgbError);
        }

        let val = u32::from_str_radix(hex, 16).map_err(|_| ParseRgbError)?;
        let [_, r, g, b] = val.to_be_bytes();
        Ok(Self::new(r, g, b))
    }
}

/// A three byte colour whose channels never exceed the LED brightness limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbSetting {
    colour: Rgb,
    max: u8,
}

impl RgbSetting {
    pub const fn new(max: u8) -> Self {
        Self {
            colour: Rgb::new(0, 0, 0),
            max,
        }
    }

    pub const fn get(&self) -> Rgb {
        self.colour
    }

    /// Stores `colour` with every channel clamped to the brightness limit.
    pub fn set(&mut self, colour: Rgb) {
        self.colour = colour.clamped(self.max);
    }

    /// Stores signed channels, so negative values clamp to zero.
    pub fn set_channels(&mut self, r: i32, g: i32, b: i32) {
        self.colour = Rgb::from_channels(r, g, b, self.max);
    }

    /// Brightness limit for each channel.
    pub const fn max(&self) -> u8 {
        self.max
    }
}

impl WireField for RgbSetting {
    fn width(&self) -> usize {
        3
    }

    // Channels are stored as received; clamping only applies to assignments.
    fn decode<B: AsRef<[u8]>>(
        &mut self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), DecodeErrorKind> {
        let [r, g, b] = cursor.read_array()?;
        self.colour = Rgb::new(r, g, b);
        Ok(())
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut PacketCursor<B>,
    ) -> Result<(), EncodeError> {
        cursor.write_bytes(&[self.colour.r, self.colour.g, self.colour.b])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ParseRgbError, Rgb, RgbSetting};

    #[test]
    fn clamps_to_brightness_max() {
        let mut setting = RgbSetting::new(127);

        setting.set_channels(300, -5, 50);
        assert_eq!(setting.get(), Rgb::new(127, 0, 50));

        setting.set(Rgb::new(255, 128, 127));
        assert_eq!(setting.get(), Rgb::new(127, 127, 127));
    }

    #[test]
    fn negative_channels_need_the_signed_setter() {
        let mut setting = RgbSetting::new(127);

        setting.set_channels(-5, -1, i32::MIN);
        assert_eq!(setting.get(), Rgb::new(0, 0, 0));

        // The same bits read as unsigned bytes are bright channels.
        setting.set(Rgb::new(-5i8 as u8, -1i8 as u8, 0));
        assert_eq!(setting.get(), Rgb::new(127, 127, 0));
    }

    #[test]
    fn hex_strings() {
        assert_eq!("#7F0010".parse::<Rgb>(), Ok(Rgb::new(0x7F, 0x00, 0x10)));
        assert_eq!("00ff00".parse::<Rgb>(), Ok(Rgb::new(0, 0xFF, 0)));
        assert_eq!("#12345".parse::<Rgb>(), Err(ParseRgbError));
        assert_eq!("+12345".parse::<Rgb>(), Err(ParseRgbError));
        assert_eq!(Rgb::new(0x7F, 0x20, 0x00).to_string(), "#7F2000");
    }
}
