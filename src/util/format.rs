//! String formatting for diagnostics and instruction descriptions.

use super::mask::NIBBLE_MASK;

/// Left-pad `s` with `fill` until it is at least `width` characters long.
pub fn pad(s: &str, width: usize, fill: char) -> String {
    let missing = width.saturating_sub(s.chars().count());
    let mut padded: String = std::iter::repeat(fill).take(missing).collect();
    padded.push_str(s);
    padded
}

/// Format a value as binary, zero-padded to `digits`.
pub fn bin(value: u32, digits: usize) -> String {
    format!("{:0width$b}", value, width = digits)
}

/// Format a value as upper case hex with a `0x` prefix, zero-padded to `digits`.
pub fn hex(value: u32, digits: usize) -> String {
    format!("0x{:0width$X}", value, width = digits)
}

/// Format a register index as `V0`..`VF`. Only the low nibble is used.
pub fn reg(index: u8) -> String {
    format!("V{:X}", index & NIBBLE_MASK as u8)
}
