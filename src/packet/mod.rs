//! Bit-exact codec for the two fixed-length Servoshock packets.
//!
//! Both packets own their raw bytes. Every named field is described by a
//! [`Field`] in [`layout`] and read or written through [`Field::read`] and
//! [`Field::write`], so mutating one field never disturbs its neighbours and
//! unnamed bits survive a round trip untouched.

pub mod input;
pub mod layout;
pub mod output;

pub use input::{decode_dpad, DPad, Finger, InputPacket, Touchpad};
pub use output::{Indicator, OutputPacket};

use crate::error::{Error, Result};

/// Padding byte clocked out once the output packet is exhausted.
pub const PADDING_BYTE: u8 = 0xCD;

/// Digital buttons in the order the board lays out its override, target and
/// echo regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    DPadUp,
    DPadRight,
    DPadDown,
    DPadLeft,
    Triangle,
    Circle,
    Cross,
    Square,
    LBumper,
    RBumper,
    LTriggerDigital,
    RTriggerDigital,
    LStickPress,
    RStickPress,
    Share,
    Options,
    TpadPress,
    PsButton,
}

impl Button {
    pub const ALL: [Button; 18] = [
        Button::DPadUp,
        Button::DPadRight,
        Button::DPadDown,
        Button::DPadLeft,
        Button::Triangle,
        Button::Circle,
        Button::Cross,
        Button::Square,
        Button::LBumper,
        Button::RBumper,
        Button::LTriggerDigital,
        Button::RTriggerDigital,
        Button::LStickPress,
        Button::RStickPress,
        Button::Share,
        Button::Options,
        Button::TpadPress,
        Button::PsButton,
    ];
}

/// Analog outputs the board drives as servo pulse widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    LStickX,
    LStickY,
    RStickX,
    RStickY,
    LTriggerAnalog,
    RTriggerAnalog,
    LTpadX,
    LTpadY,
    RTpadX,
    RTpadY,
    TiltX,
    TiltY,
}

impl Channel {
    pub const ALL: [Channel; 12] = [
        Channel::LStickX,
        Channel::LStickY,
        Channel::RStickX,
        Channel::RStickY,
        Channel::LTriggerAnalog,
        Channel::RTriggerAnalog,
        Channel::LTpadX,
        Channel::LTpadY,
        Channel::RTpadX,
        Channel::RTpadY,
        Channel::TiltX,
        Channel::TiltY,
    ];
}

/// Controller feedback the host can take over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    Led,
    RumbleLow,
    RumbleHigh,
}

impl Feedback {
    pub const ALL: [Feedback; 3] = [Feedback::Led, Feedback::RumbleLow, Feedback::RumbleHigh];
}

/// A contiguous run of bits inside a packet.
///
/// Bit 0 is the least significant bit of the byte at `offset`; runs that
/// cross a byte boundary continue into the following bytes little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(offset: usize, shift: u8, width: u8) -> Self {
        Self {
            offset,
            shift,
            width,
        }
    }

    pub const fn flag(offset: usize, bit: u8) -> Self {
        Self::new(offset, bit, 1)
    }

    pub const fn byte(offset: usize) -> Self {
        Self::new(offset, 0, 8)
    }

    /// Little-endian 16-bit word.
    pub const fn word(offset: usize) -> Self {
        Self::new(offset, 0, 16)
    }

    /// Number of bytes the field touches.
    pub const fn span(&self) -> usize {
        (self.shift as usize + self.width as usize + 7) / 8
    }

    pub const fn mask(&self) -> u32 {
        (1u32 << self.width) - 1
    }

    pub(crate) fn read(&self, bytes: &[u8]) -> u32 {
        let raw = bytes[self.offset..self.offset + self.span()]
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| acc | (u32::from(*b) << (8 * i)));
        (raw >> self.shift) & self.mask()
    }

    /// Read-modify-write of only the bits this field owns. `value` is
    /// truncated to the field width; use [`Field::checked`] first when the
    /// value comes from a caller.
    pub(crate) fn write(&self, bytes: &mut [u8], value: u32) {
        let mask = self.mask() << self.shift;
        let bits = (value << self.shift) & mask;
        for i in 0..self.span() {
            let m = (mask >> (8 * i)) as u8;
            let b = (bits >> (8 * i)) as u8;
            let byte = &mut bytes[self.offset + i];
            *byte = (*byte & !m) | b;
        }
    }

    pub(crate) fn read_bool(&self, bytes: &[u8]) -> bool {
        self.read(bytes) != 0
    }

    pub(crate) fn write_bool(&self, bytes: &mut [u8], value: bool) {
        self.write(bytes, u32::from(value));
    }

    /// Rejects values wider than the field instead of truncating them.
    pub fn checked(&self, name: &'static str, value: u32) -> Result<u32> {
        if value <= self.mask() {
            Ok(value)
        } else {
            Err(Error::ValueOutOfRange {
                field: name,
                value,
                bits: self.width,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_preserves_neighbour_bits() {
        let mut bytes = [0xFFu8; 2];
        Field::new(0, 3, 2).write(&mut bytes, 0);
        assert_eq!(bytes, [0b1110_0111, 0xFF]);
    }

    #[test]
    fn test_field_crossing_bytes() {
        let mut bytes = [0u8; 3];
        let y = Field::new(0, 4, 12);
        y.write(&mut bytes, 0xABC);
        assert_eq!(bytes, [0xC0, 0xAB, 0x00]);
        assert_eq!(y.read(&bytes), 0xABC);
        assert_eq!(y.span(), 2);
    }

    #[test]
    fn test_word_is_little_endian() {
        let mut bytes = [0u8; 2];
        Field::word(0).write(&mut bytes, 1500);
        assert_eq!(bytes, 1500u16.to_le_bytes());
    }

    #[test]
    fn test_checked_rejects_wide_values() {
        let field = Field::new(0, 2, 6);
        assert_eq!(field.checked("counter", 63), Ok(63));
        assert_eq!(
            field.checked("counter", 64),
            Err(Error::ValueOutOfRange {
                field: "counter",
                value: 64,
                bits: 6
            })
        );
    }
}
