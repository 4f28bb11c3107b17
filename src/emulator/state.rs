//! The machine state as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use super::error::{Error, Result};
use super::sprite::{self, FONT};
use crate::util::mask::{BYTE_MASK, NIBBLE_MASK, WORD_MASK};

/// Size of system memory, in bytes.
pub const MEMORY_SIZE: usize = 0xFFF;
/// Where programs are loaded and start executing.
pub const PROGRAM_ORIGIN: u16 = 0x200;
/// Where the built-in font is loaded.
pub const FONT_OFFSET: u16 = 0x000;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
/// VF doubles as carry, borrow, shift and collision flag.
pub const FLAG_REGISTER: usize = 0xF;

/// Registers, memory, stack and timers of a single emulation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    program_counter: u16,
    stack_pointer: u8,
    address_register: u16,
    memory: [u8; MEMORY_SIZE],
    registers: [u8; NUM_REGISTERS],
    stack: [u16; STACK_SIZE],
    delay_timer: u8,
    sound_timer: u8,
    system_font_offset: u16,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    /// Create a freshly reset state with the font loaded.
    pub fn new() -> MachineState {
        let mut state = MachineState {
            program_counter: 0,
            stack_pointer: 0,
            address_register: 0,
            memory: [0; MEMORY_SIZE],
            registers: [0; NUM_REGISTERS],
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            system_font_offset: FONT_OFFSET,
        };
        state.reset();
        state
    }

    /// Zero everything, then reload the font.
    pub fn reset(&mut self) {
        self.program_counter = 0;
        self.stack_pointer = 0;
        self.address_register = 0;
        self.memory = [0; MEMORY_SIZE];
        self.registers = [0; NUM_REGISTERS];
        self.stack = [0; STACK_SIZE];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.load_system_font();
    }

    /// Copy a program into memory at the program origin and point the program counter at it.
    /// Nothing is changed if the program does not fit.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        let capacity = MEMORY_SIZE - PROGRAM_ORIGIN as usize;
        if program.len() > capacity {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                capacity,
            });
        }

        self.write_memory(PROGRAM_ORIGIN as usize, program)?;
        self.program_counter = PROGRAM_ORIGIN;
        Ok(())
    }

    fn load_system_font(&mut self) {
        let start = FONT_OFFSET as usize;
        self.memory[start..start + FONT.len()].copy_from_slice(&FONT);
        self.system_font_offset = FONT_OFFSET;
    }

    pub fn system_font_offset(&self) -> u16 {
        self.system_font_offset
    }

    /// Address of the font glyph for the hex digit `character`.
    pub fn glyph_address(&self, character: u8) -> u16 {
        self.system_font_offset + sprite::glyph_offset(character) as u16
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn set_program_counter(&mut self, value: u32) {
        self.program_counter = (value & WORD_MASK) as u16;
    }

    /// Move past one instruction. Also used to skip the next instruction.
    pub fn advance_program_counter(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    /// Read the big endian instruction word at the program counter.
    pub fn read_instruction(&self) -> Result<u16> {
        let bytes = self.read_memory(self.program_counter as usize, 2)?;
        Ok(((bytes[0] as u16) << 8) | bytes[1] as u16)
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    /// Push the program counter and jump to `address`.
    pub fn call(&mut self, address: u16) -> Result<()> {
        let slot = self.stack_pointer as usize;
        if slot >= STACK_SIZE {
            return Err(Error::StackOverflow { address });
        }
        self.stack[slot] = self.program_counter;
        self.stack_pointer += 1;
        self.program_counter = address;
        Ok(())
    }

    /// Pop the most recent return address into the program counter.
    pub fn ret(&mut self) -> Result<()> {
        if self.stack_pointer == 0 {
            return Err(Error::StackUnderflow);
        }
        self.stack_pointer -= 1;
        self.program_counter = self.stack[self.stack_pointer as usize];
        Ok(())
    }

    pub fn address_register(&self) -> u16 {
        self.address_register
    }

    pub fn set_address_register(&mut self, value: u32) {
        self.address_register = (value & WORD_MASK) as u16;
    }

    pub fn register(&self, register: usize) -> u8 {
        self.registers[register & NIBBLE_MASK as usize]
    }

    pub fn set_register(&mut self, register: usize, value: u16) {
        self.registers[register & NIBBLE_MASK as usize] = (value & BYTE_MASK) as u8;
    }

    pub fn set_flag(&mut self, set: bool) {
        self.set_register(FLAG_REGISTER, set as u16);
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn read_memory(&self, offset: usize, len: usize) -> Result<&[u8]> {
        if len == 0 {
            return Ok(&[]);
        }
        let end = Self::checked_end(offset, len)?;
        Ok(&self.memory[offset..end])
    }

    /// Copy `data` into memory starting at `offset`.
    pub fn write_memory(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let end = Self::checked_end(offset, data.len())?;
        self.memory[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn checked_end(offset: usize, len: usize) -> Result<usize> {
        let end = offset + len;
        if end > MEMORY_SIZE {
            return Err(Error::MemoryOutOfBounds {
                address: offset.max(MEMORY_SIZE),
            });
        }
        Ok(end)
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// Count both timers down by one, stopping at zero.
    /// Hosts call this at 60 Hz; the CPU never does.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
