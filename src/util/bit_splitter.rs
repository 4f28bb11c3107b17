use super::mask::{ADDRESS_MASK, BYTE_MASK, NIBBLE_MASK};

/// A structure for easily splitting an instruction word
/// into the fields the decoder works with, such as the
/// four nibbles, the low byte or the trailing 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {
    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & BYTE_MASK) as u8)
    }

    /// Left-shift the first u8-component 8 bits,
    /// then take bitwise or with the second component
    /// in order to store the components in a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// The four nibbles, most significant first.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    /// The top nibble, selecting the opcode family.
    pub fn family(&self) -> u8 {
        self.0 >> 4
    }

    pub fn x(&self) -> u8 {
        self.0 & NIBBLE_MASK as u8
    }

    pub fn y(&self) -> u8 {
        self.1 >> 4
    }

    pub fn n(&self) -> u8 {
        self.1 & NIBBLE_MASK as u8
    }

    pub fn kk(&self) -> u8 {
        self.1
    }

    pub fn nnn(&self) -> u16 {
        self.as_u16() & ADDRESS_MASK
    }
}
