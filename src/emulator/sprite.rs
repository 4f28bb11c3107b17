//! The built-in hexadecimal font and helpers for walking sprite pixels.

use crate::util::mask::NIBBLE_MASK;

/// Rows in each glyph of the built-in font.
pub const GLYPH_HEIGHT: usize = 5;

/// Sprites are always one byte, eight pixels, wide.
pub const SPRITE_WIDTH: usize = 8;

/// Glyphs for 0-F, five rows each.
pub const FONT: [u8; 16 * GLYPH_HEIGHT] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Offset of the glyph for `character` relative to the start of the font.
/// Only the low nibble selects the glyph.
pub fn glyph_offset(character: u8) -> usize {
    (character & NIBBLE_MASK as u8) as usize * GLYPH_HEIGHT
}

/// The `(x, y)` offsets of every pixel in a `width` by `height` sprite, row by row.
pub fn pixels(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

/// Whether `(x, y)` lies on a `width` by `height` display.
pub fn in_bounds(width: usize, height: usize, (x, y): (usize, usize)) -> bool {
    x < width && y < height
}
