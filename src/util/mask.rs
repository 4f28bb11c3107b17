//! Masks used to keep values within the width of the register or field they are stored in.

pub const BIT_MASK: u16 = 0x1;
pub const NIBBLE_MASK: u16 = 0xF;
pub const BYTE_MASK: u16 = 0xFF;
pub const ADDRESS_MASK: u16 = 0xFFF;
pub const WORD_MASK: u32 = 0xFFFF;
