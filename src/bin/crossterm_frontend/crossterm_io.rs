use chip8_vm::emulator::io::{EmulatorIo, DISPLAY_HEIGHT, DISPLAY_WIDTH};

use super::key_manager::KeyManager;

use crossterm::event::KeyCode;
use crossterm::style::Print;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};

/// The key that quits the frontend.
pub const QUIT_KEY: KeyCode = KeyCode::Char('q');

/// Draws to the terminal, two characters per pixel, and reads the hex keypad from the keyboard.
pub struct CrosstermIo<'a> {
    key_manager: &'a KeyManager,
    cells: [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
    out: Stdout,
    dirty: bool,
    quit: bool,
}

impl<'a> CrosstermIo<'a> {
    pub fn new(key_manager: &'a KeyManager) -> crossterm::Result<CrosstermIo<'a>> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;

        let mut io = CrosstermIo {
            key_manager,
            cells: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            out,
            dirty: false,
            quit: false,
        };
        io.draw_border()?;
        Ok(io)
    }

    fn draw_border(&mut self) -> crossterm::Result<()> {
        let edge = "━".repeat(2 * DISPLAY_WIDTH);
        let bottom = DISPLAY_HEIGHT as u16 + 2;
        let right = 2 * DISPLAY_WIDTH as u16 + 2;

        queue!(self.out, cursor::MoveTo(1, 1), Print(format!("┏{}┓", edge)))?;
        for y in 2..bottom {
            queue!(
                self.out,
                cursor::MoveTo(1, y),
                Print('┃'),
                cursor::MoveTo(right, y),
                Print('┃')
            )?;
        }
        queue!(self.out, cursor::MoveTo(1, bottom), Print(format!("┗{}┛", edge)))?;
        self.out.flush()?;
        Ok(())
    }

    fn draw(&mut self, x: usize, y: usize, state: u8) {
        let cell = if state == 1 { "██" } else { "  " };
        let result = queue!(
            self.out,
            cursor::MoveTo(2 * x as u16 + 2, y as u16 + 2),
            Print(cell)
        );
        if let Err(e) = result {
            log::error!("Could not draw pixel ({}, {}): {}", x, y, e);
        }
        self.dirty = true;
    }

    /// Whether the user asked to quit, either just now or while a key was awaited.
    pub fn quit_requested(&self) -> bool {
        self.quit || self.key_manager.is_pressed(QUIT_KEY)
    }
}

impl Drop for CrosstermIo<'_> {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.out, LeaveAlternateScreen, cursor::Show);
    }
}

impl EmulatorIo for CrosstermIo<'_> {
    fn clear_display(&mut self) {
        self.cells = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                self.draw(x, y, 0);
            }
        }
    }

    fn draw_pixel(&mut self, x: usize, y: usize, bit: u8) -> bool {
        let lit = self.cells[y][x];
        let flipped = lit ^ (bit & 1);
        if flipped != lit {
            self.cells[y][x] = flipped;
            self.draw(x, y, flipped);
        }
        lit == 1 && flipped == 0
    }

    fn render(&mut self) {
        if self.dirty {
            if let Err(e) = self.out.flush() {
                log::error!("Could not flush terminal: {}", e);
            }
            self.dirty = false;
        }
    }

    fn is_key_pressed(&self, key: u8) -> bool {
        key_codes(key)
            .iter()
            .any(|&code| self.key_manager.is_pressed(code))
    }

    // Quitting while waiting hands back key 0 and leaves the rest to `quit_requested`
    fn wait_for_keypress(&mut self) -> u8 {
        loop {
            let key = self.key_manager.next_key();
            if key == QUIT_KEY {
                self.quit = true;
                return 0;
            }
            if let Some(hex) = hex_key(key) {
                return hex;
            }
        }
    }
}

/// Keys 0-9 and a-f, in either case, map onto the keypad.
fn hex_key(key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Char(c) => c.to_digit(16).map(|digit| digit as u8),
        _ => None,
    }
}

/// Every terminal key that stands for keypad `key`, lower and upper case.
fn key_codes(key: u8) -> Vec<KeyCode> {
    let lower = match std::char::from_digit(key as u32, 16) {
        Some(c) => c,
        None => return Vec::new(),
    };
    let upper = lower.to_ascii_uppercase();
    if upper == lower {
        vec![KeyCode::Char(lower)]
    } else {
        vec![KeyCode::Char(lower), KeyCode::Char(upper)]
    }
}
