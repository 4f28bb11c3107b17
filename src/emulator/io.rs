use std::collections::VecDeque;
use std::fmt;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Everything the CPU needs from the outside world: a display and a keypad.
///
/// Keys are in the range 0..=0xF.
pub trait EmulatorIo {
    /// Blank the display.
    fn clear_display(&mut self);

    /// XOR `bit` onto the pixel at `(x, y)`.
    /// Returns true if a lit pixel was turned off.
    ///
    /// The CPU only passes coordinates inside the display.
    fn draw_pixel(&mut self, x: usize, y: usize, bit: u8) -> bool;

    /// Called once per cycle, e.g. to flush a frame buffer.
    fn render(&mut self) {}

    fn is_key_pressed(&self, key: u8) -> bool;

    /// Block until a key is pressed and return it.
    fn wait_for_keypress(&mut self) -> u8;

    fn display_width(&self) -> usize {
        DISPLAY_WIDTH
    }

    fn display_height(&self) -> usize {
        DISPLAY_HEIGHT
    }
}

/// A frame buffer without a screen, with scripted keys.
/// Useful for tests and for running programs without a terminal.
#[derive(Debug, Clone)]
pub struct HeadlessIo {
    width: usize,
    height: usize,
    cells: Vec<u8>,
    pressed: [bool; 16],
    key_presses: VecDeque<u8>,
    renders: usize,
}

impl HeadlessIo {
    pub fn new() -> HeadlessIo {
        HeadlessIo::with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    /// Panics if either dimension is zero.
    pub fn with_size(width: usize, height: usize) -> HeadlessIo {
        assert!(
            width > 0 && height > 0,
            "display must be at least 1x1, got {}x{}",
            width,
            height
        );
        HeadlessIo {
            width,
            height,
            cells: vec![0; width * height],
            pressed: [false; 16],
            key_presses: VecDeque::new(),
            renders: 0,
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.cells[self.index(x, y)]
    }

    pub fn lit_pixels(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 1).count()
    }

    /// Hold `key` down until released.
    pub fn press(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(key as usize) {
            *pressed = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(key as usize) {
            *pressed = false;
        }
    }

    /// Queue a key for the next blocking wait.
    pub fn queue_key_press(&mut self, key: u8) {
        self.key_presses.push_back(key);
    }

    /// Number of completed cycles, as seen by `render`.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Default for HeadlessIo {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorIo for HeadlessIo {
    fn clear_display(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = 0);
    }

    fn draw_pixel(&mut self, x: usize, y: usize, bit: u8) -> bool {
        let index = self.index(x, y);
        let old_pixel = self.cells[index];
        let xored_pixel = old_pixel ^ (bit & 1);
        self.cells[index] = xored_pixel;
        old_pixel == 1 && xored_pixel == 0
    }

    fn render(&mut self) {
        self.renders += 1;
    }

    fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed.get(key as usize).copied().unwrap_or(false)
    }

    // There is nobody to wait for, so an empty queue reads as key 0.
    fn wait_for_keypress(&mut self) -> u8 {
        self.key_presses.pop_front().unwrap_or_else(|| {
            log::warn!("Waiting for a key press without input, using key 0");
            0
        })
    }

    fn display_width(&self) -> usize {
        self.width
    }

    fn display_height(&self) -> usize {
        self.height
    }
}

impl fmt::Display for HeadlessIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                write!(f, "{}", if *cell == 1 { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
