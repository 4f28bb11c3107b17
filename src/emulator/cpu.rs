//! The fetch-decode-execute cycle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::dump::Dump;
use super::error::Result;
use super::instruction::*;
use super::io::EmulatorIo;
use super::sprite::{self, SPRITE_WIDTH};
use super::state::MachineState;
use crate::util::format::{bin, hex};
use crate::util::mask::BIT_MASK;

/// A CHIP-8 CPU wired to an I/O backend and a source of randomness.
pub struct Cpu<IO: EmulatorIo, R: Rng = StdRng> {
    state: MachineState,
    io: IO,
    rng: R,
}

impl<IO: EmulatorIo> Cpu<IO, StdRng> {
    /// Create a CPU with an entropy-seeded random number generator.
    pub fn new(io: IO) -> Cpu<IO, StdRng> {
        Cpu::with_rng(io, StdRng::from_entropy())
    }
}

impl<IO: EmulatorIo, R: Rng> Cpu<IO, R> {
    /// Create a CPU drawing random numbers from `rng`, e.g. a seeded one for reproducible runs.
    pub fn with_rng(io: IO, rng: R) -> Cpu<IO, R> {
        let mut cpu = Cpu {
            state: MachineState::new(),
            io,
            rng,
        };
        cpu.reset();
        cpu
    }

    /// Zero the machine, reload the font and clear the display.
    pub fn reset(&mut self) {
        log::debug!("Resetting CPU");
        self.state.reset();
        self.io.clear_display();
    }

    /// Copy a program into memory at 0x200 and jump to it.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.state.load(program)?;
        log::debug!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Perform a single cycle: fetch, decode, advance the program counter,
    /// execute, then render.
    pub fn step(&mut self) -> Result<Instruction> {
        let address = self.state.program_counter();
        let word = self.state.read_instruction()?;
        let instruction = Instruction::decode(word)?;

        log::trace!("[{}] {} {}", hex(address as u32, 4), hex(word as u32, 4), instruction);

        self.state.advance_program_counter();
        self.execute(instruction)?;
        self.io.render();

        Ok(instruction)
    }

    /// Execute many instructions in order, stopping at the first fault.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<()> {
        for &instruction in instructions {
            self.execute(instruction)?;
        }
        Ok(())
    }

    /// Execute a single instruction without fetching it.
    /// The program counter is expected to already point past it.
    pub fn execute(&mut self, instruction: Instruction) -> Result<()> {
        let state = &mut self.state;
        let v = |state: &MachineState, Reg(x): Reg| state.register(x as usize);

        match instruction {
            Instruction::Sys(_) => {}

            Instruction::ClearScreen => self.io.clear_display(),

            // Return to the previous call site via the stack.
            Instruction::Return => state.ret()?,

            Instruction::Goto(Addr(addr)) => state.set_program_counter(addr as u32),

            // Store the current address on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => state.call(addr)?,

            Instruction::SkipIfRegEqConst(x, Const(n)) => {
                if v(state, x) == n {
                    state.advance_program_counter();
                }
            }

            Instruction::SkipIfRegNeqConst(x, Const(n)) => {
                if v(state, x) != n {
                    state.advance_program_counter();
                }
            }

            Instruction::SkipIfRegEqReg(x, y) => {
                if v(state, x) == v(state, y) {
                    state.advance_program_counter();
                }
            }

            Instruction::SkipIfRegNeqReg(x, y) => {
                if v(state, x) != v(state, y) {
                    state.advance_program_counter();
                }
            }

            Instruction::SetRegToConst(Reg(x), Const(n)) => state.set_register(x as usize, n as u16),

            // No carry flag, unlike IncRegByReg
            Instruction::IncRegByConst(Reg(x), Const(n)) => {
                let sum = v(state, Reg(x)) as u16 + n as u16;
                state.set_register(x as usize, sum);
            }

            Instruction::SetRegToReg(Reg(x), y) => {
                let vy = v(state, y);
                state.set_register(x as usize, vy as u16);
            }

            Instruction::BitwiseOr(Reg(x), y) => {
                let result = v(state, Reg(x)) | v(state, y);
                state.set_register(x as usize, result as u16);
            }

            Instruction::BitwiseAnd(Reg(x), y) => {
                let result = v(state, Reg(x)) & v(state, y);
                state.set_register(x as usize, result as u16);
            }

            Instruction::BitwiseXor(Reg(x), y) => {
                let result = v(state, Reg(x)) ^ v(state, y);
                state.set_register(x as usize, result as u16);
            }

            // VF is set when the sum does not fit in a byte
            Instruction::IncRegByReg(Reg(x), y) => {
                let sum = v(state, Reg(x)) as u16 + v(state, y) as u16;
                state.set_register(x as usize, sum);
                state.set_flag(sum > 0xFF);
            }

            // VF is set when Vx > Vy, i.e. strictly no borrow
            Instruction::DecRegByReg(Reg(x), y) => {
                let (vx, vy) = (v(state, Reg(x)), v(state, y));
                state.set_register(x as usize, vx.wrapping_sub(vy) as u16);
                state.set_flag(vx > vy);
            }

            Instruction::SetVxVyMinusVx(Reg(x), y) => {
                let (vx, vy) = (v(state, Reg(x)), v(state, y));
                state.set_register(x as usize, vy.wrapping_sub(vx) as u16);
                state.set_flag(vy > vx);
            }

            // Shift Vy into Vx, the bit shifted out goes to VF
            Instruction::BitshiftRight(Reg(x), y) => {
                let vy = v(state, y);
                state.set_register(x as usize, (vy >> 1) as u16);
                state.set_flag(vy & 1 == 1);
            }

            Instruction::BitshiftLeft(Reg(x), y) => {
                let vy = v(state, y);
                state.set_register(x as usize, (vy as u16) << 1);
                state.set_flag(vy >> 7 == 1);
            }

            Instruction::SetI(Addr(addr)) => state.set_address_register(addr as u32),

            Instruction::GotoV0PlusAddr(Addr(addr)) => {
                let v0 = v(state, Reg(0));
                state.set_program_counter(addr as u32 + v0 as u32);
            }

            Instruction::SetRegToRand(Reg(x), Const(n)) => {
                let random: u8 = self.rng.gen();
                state.set_register(x as usize, (random & n) as u16);
            }

            Instruction::Draw(x, y, Const(sprite_height)) => {
                let (width, height) = (self.io.display_width(), self.io.display_height());

                // The origin wraps around the display, the rest of the sprite is clipped
                let x_coord = v(state, x) as usize % width;
                let y_coord = v(state, y) as usize % height;

                // Get sprite, each row is 8 bits
                let sprite_addr = state.address_register() as usize;
                let sprite_data = state.read_memory(sprite_addr, sprite_height as usize)?;

                let mut any_collisions = false;
                for (dx, dy) in sprite::pixels(SPRITE_WIDTH, sprite_data.len()) {
                    let target = (x_coord + dx, y_coord + dy);
                    if !sprite::in_bounds(width, height, target) {
                        continue;
                    }
                    let row = sprite_data[dy];
                    if dx == 0 {
                        log::trace!("Sprite row {} at {:?}", bin(row as u32, 8), target);
                    }
                    let new_pixel = (row >> (7 - dx)) & BIT_MASK as u8;
                    any_collisions |= self.io.draw_pixel(target.0, target.1, new_pixel);
                }

                state.set_flag(any_collisions);
            }

            // Keys above 0xF do not exist, so are never pressed
            Instruction::SkipIfKeyPressed(x) => {
                let key = v(state, x);
                if key <= 0xF && self.io.is_key_pressed(key) {
                    state.advance_program_counter();
                }
            }

            Instruction::SkipIfKeyNotPressed(x) => {
                let key = v(state, x);
                if key > 0xF || !self.io.is_key_pressed(key) {
                    state.advance_program_counter();
                }
            }

            Instruction::SetRegToDelayTimer(Reg(x)) => {
                let delay = state.delay_timer();
                state.set_register(x as usize, delay as u16);
            }

            // Get a key press (blocking)
            Instruction::WaitForKey(Reg(x)) => {
                let key = self.io.wait_for_keypress();
                state.set_register(x as usize, key as u16);
            }

            Instruction::SetDelayTimerToReg(x) => {
                let vx = v(state, x);
                state.set_delay_timer(vx);
            }

            Instruction::SetSoundTimerToReg(x) => {
                let vx = v(state, x);
                state.set_sound_timer(vx);
            }

            Instruction::AddRegToI(x) => {
                let sum = state.address_register() as u32 + v(state, x) as u32;
                state.set_address_register(sum);
            }

            // Set I to the font glyph of the low nibble of Vx
            Instruction::SetIToGlyph(x) => {
                let glyph = state.glyph_address(v(state, x));
                state.set_address_register(glyph as u32);
            }

            // Hundreds, tens and ones at I, I + 1 and I + 2
            Instruction::StoreBcd(x) => {
                let vx = v(state, x);
                let digits = [vx / 100, vx / 10 % 10, vx % 10];
                state.write_memory(state.address_register() as usize, &digits)?;
            }

            // Dump register values V0 through Vx
            Instruction::RegDump(Reg(x)) => {
                let last = x as usize & 0xF;
                let values = state.registers()[..=last].to_vec();
                state.write_memory(state.address_register() as usize, &values)?;
            }

            // Load register values V0 through Vx
            Instruction::RegLoad(Reg(x)) => {
                let count = (x as usize & 0xF) + 1;
                let values = state
                    .read_memory(state.address_register() as usize, count)?
                    .to_vec();
                for (reg_no, value) in values.into_iter().enumerate() {
                    state.set_register(reg_no, value as u16);
                }
            }
        };

        Ok(())
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn dump(&self) -> Dump {
        Dump::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::error::Error;
    use crate::emulator::io::HeadlessIo;
    use crate::emulator::state::{FONT_OFFSET, PROGRAM_ORIGIN};
    use pretty_assertions::assert_eq;
    use rand::rngs::mock::StepRng;

    fn cpu() -> Cpu<HeadlessIo, StepRng> {
        Cpu::with_rng(HeadlessIo::new(), StepRng::new(0xAB, 0))
    }

    fn cpu_with_program(program: &[u8]) -> Cpu<HeadlessIo, StepRng> {
        let mut cpu = cpu();
        cpu.load(program).unwrap();
        cpu
    }

    fn run(cpu: &mut Cpu<HeadlessIo, StepRng>, instructions: &[Instruction]) {
        cpu.execute_many(instructions).unwrap();
    }

    fn reg(cpu: &Cpu<HeadlessIo, StepRng>, x: usize) -> u8 {
        cpu.state().register(x)
    }

    #[test]
    fn goto_goes_to() {
        let mut cpu = cpu();
        run(&mut cpu, &[Instruction::Goto(Addr(0x250))]);
        assert_eq!(0x250, cpu.state().program_counter());
    }

    #[test]
    fn return_after_call_is_neutral() {
        // Write program with call and return
        let mut cpu = cpu_with_program(&[
            0x22, 0x06, // 0x200, call 0x206
            0x00, 0x00, // 0x202
            0x00, 0x00, // 0x204
            0x00, 0xEE, // 0x206, return
        ]);
        assert_eq!(PROGRAM_ORIGIN, cpu.state().program_counter());

        // Run the program
        cpu.step().unwrap(); // Call 0x206
        assert_eq!(0x206, cpu.state().program_counter());
        cpu.step().unwrap(); // Return to 202
        assert_eq!(0x202, cpu.state().program_counter());
    }

    #[test]
    fn call_pushes_the_address_after_the_call() {
        let mut cpu = cpu_with_program(&[0x23, 0x00]);
        cpu.state_mut().write_memory(0x300, &[0x00, 0xEE]).unwrap();

        cpu.step().unwrap();
        assert_eq!(0x300, cpu.state().program_counter());
        assert_eq!(0x202, cpu.state().stack()[0]);

        cpu.step().unwrap();
        assert_eq!(0x202, cpu.state().program_counter());
    }

    #[test]
    fn step_returns_the_executed_instruction_and_renders() {
        let mut cpu = cpu_with_program(&[0x6A, 0x05]);
        assert_eq!(
            Ok(Instruction::SetRegToConst(Reg(0xA), Const(5))),
            cpu.step()
        );
        assert_eq!(1, cpu.io().renders());
    }

    #[test]
    fn unknown_instruction_leaves_program_counter_in_place() {
        let mut cpu = cpu_with_program(&[0x80, 0xF8]);
        assert_eq!(Err(Error::UnknownInstruction(0x80F8)), cpu.step());
        assert_eq!(PROGRAM_ORIGIN, cpu.state().program_counter());
    }

    #[test]
    fn fetch_past_end_of_memory_faults() {
        let mut cpu = cpu();
        run(&mut cpu, &[Instruction::Goto(Addr(0xFFE))]);
        assert_eq!(Err(Error::MemoryOutOfBounds { address: 0xFFF }), cpu.step());
    }

    #[test]
    fn ret_with_empty_stack_faults() {
        let mut cpu = cpu();
        assert_eq!(Err(Error::StackUnderflow), cpu.execute(Instruction::Return));
    }

    #[test]
    fn seventeenth_nested_call_overflows() {
        let mut cpu = cpu();
        let calls = [Instruction::Call(Addr(0x300)); 16];
        run(&mut cpu, &calls);
        assert_eq!(
            Err(Error::StackOverflow { address: 0x300 }),
            cpu.execute(Instruction::Call(Addr(0x300)))
        );
    }

    #[test]
    fn sys_is_ignored() {
        let mut cpu = cpu_with_program(&[0x01, 0x23]);
        let before = cpu.state().clone();
        cpu.step().unwrap();
        assert_eq!(0x202, cpu.state().program_counter());
        assert_eq!(before.registers(), cpu.state().registers());
    }

    #[test]
    fn skips() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(7)),
            Instruction::SetRegToConst(Reg(2), Const(7)),
            Instruction::Goto(Addr(0x200)),
        ]);

        let skip_cases = [
            (Instruction::SkipIfRegEqConst(Reg(1), Const(7)), true),
            (Instruction::SkipIfRegEqConst(Reg(1), Const(8)), false),
            (Instruction::SkipIfRegNeqConst(Reg(1), Const(8)), true),
            (Instruction::SkipIfRegNeqConst(Reg(1), Const(7)), false),
            (Instruction::SkipIfRegEqReg(Reg(1), Reg(2)), true),
            (Instruction::SkipIfRegEqReg(Reg(1), Reg(3)), false),
            (Instruction::SkipIfRegNeqReg(Reg(1), Reg(3)), true),
            (Instruction::SkipIfRegNeqReg(Reg(1), Reg(2)), false),
        ];

        for &(instruction, skips) in &skip_cases {
            cpu.state_mut().set_program_counter(0x200);
            cpu.execute(instruction).unwrap();
            let expected = if skips { 0x202 } else { 0x200 };
            assert_eq!(expected, cpu.state().program_counter(), "{}", instruction);
        }
    }

    #[test]
    fn inc_by_const_wraps_without_carry() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(0xF), Const(0x42)),
            Instruction::SetRegToConst(Reg(1), Const(0xFF)),
            Instruction::IncRegByConst(Reg(1), Const(2)),
        ]);
        assert_eq!(0x01, reg(&cpu, 1));
        assert_eq!(0x42, reg(&cpu, 0xF));
    }

    #[test]
    fn bitwise_operations() {
        let mut cpu = cpu();
        let setup = [
            Instruction::SetRegToConst(Reg(1), Const(0b1100)),
            Instruction::SetRegToConst(Reg(2), Const(0b1010)),
        ];

        run(&mut cpu, &setup);
        run(&mut cpu, &[Instruction::BitwiseOr(Reg(1), Reg(2))]);
        assert_eq!(0b1110, reg(&cpu, 1));

        run(&mut cpu, &setup);
        run(&mut cpu, &[Instruction::BitwiseAnd(Reg(1), Reg(2))]);
        assert_eq!(0b1000, reg(&cpu, 1));

        run(&mut cpu, &setup);
        run(&mut cpu, &[Instruction::BitwiseXor(Reg(1), Reg(2))]);
        assert_eq!(0b0110, reg(&cpu, 1));

        run(&mut cpu, &[Instruction::SetRegToReg(Reg(3), Reg(2))]);
        assert_eq!(0b1010, reg(&cpu, 3));
    }

    #[test]
    fn add_sets_carry() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0xFF)),
            Instruction::SetRegToConst(Reg(2), Const(0x01)),
            Instruction::IncRegByReg(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x00, reg(&cpu, 1));
        assert_eq!(1, reg(&cpu, 0xF));

        run(&mut cpu, &[Instruction::IncRegByReg(Reg(1), Reg(2))]);
        assert_eq!(0x01, reg(&cpu, 1));
        assert_eq!(0, reg(&cpu, 0xF));
    }

    #[test]
    fn sub_flag_is_set_only_when_vx_is_greater() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0x05)),
            Instruction::SetRegToConst(Reg(2), Const(0x0A)),
            Instruction::DecRegByReg(Reg(1), Reg(2)),
        ]);
        assert_eq!(0xFB, reg(&cpu, 1));
        assert_eq!(0, reg(&cpu, 0xF));

        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0x0A)),
            Instruction::DecRegByReg(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x00, reg(&cpu, 1));
        assert_eq!(0, reg(&cpu, 0xF), "equal operands do not set the flag");

        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0x0B)),
            Instruction::DecRegByReg(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x01, reg(&cpu, 1));
        assert_eq!(1, reg(&cpu, 0xF));
    }

    #[test]
    fn subn_subtracts_vx_from_vy() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0x05)),
            Instruction::SetRegToConst(Reg(2), Const(0x0A)),
            Instruction::SetVxVyMinusVx(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x05, reg(&cpu, 1));
        assert_eq!(1, reg(&cpu, 0xF));

        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0x0B)),
            Instruction::SetVxVyMinusVx(Reg(1), Reg(2)),
        ]);
        assert_eq!(0xFF, reg(&cpu, 1));
        assert_eq!(0, reg(&cpu, 0xF));
    }

    #[test]
    fn shifts_read_from_vy() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(2), Const(0x03)),
            Instruction::BitshiftRight(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x01, reg(&cpu, 1));
        assert_eq!(0x03, reg(&cpu, 2));
        assert_eq!(1, reg(&cpu, 0xF));

        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(2), Const(0x81)),
            Instruction::BitshiftLeft(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x02, reg(&cpu, 1));
        assert_eq!(1, reg(&cpu, 0xF));

        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(2), Const(0x40)),
            Instruction::BitshiftLeft(Reg(1), Reg(2)),
        ]);
        assert_eq!(0x80, reg(&cpu, 1));
        assert_eq!(0, reg(&cpu, 0xF));
    }

    #[test]
    fn flag_wins_when_vf_is_the_destination() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(0xF), Const(0xFF)),
            Instruction::SetRegToConst(Reg(1), Const(0x01)),
            Instruction::IncRegByReg(Reg(0xF), Reg(1)),
        ]);
        assert_eq!(1, reg(&cpu, 0xF));
    }

    #[test]
    fn address_register_instructions() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0xFFF)),
            Instruction::SetRegToConst(Reg(3), Const(0x10)),
            Instruction::AddRegToI(Reg(3)),
        ]);
        assert_eq!(0x100F, cpu.state().address_register());
        assert_eq!(0, reg(&cpu, 0xF), "ADD I does not touch VF");
    }

    #[test]
    fn goto_v0_plus_addr() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(0), Const(0x10)),
            Instruction::GotoV0PlusAddr(Addr(0x300)),
        ]);
        assert_eq!(0x310, cpu.state().program_counter());
    }

    #[test]
    fn rand_is_masked_and_deterministic() {
        let mut cpu = cpu();
        run(&mut cpu, &[Instruction::SetRegToRand(Reg(4), Const(0x0F))]);
        assert_eq!(0xAB & 0x0F, reg(&cpu, 4));
        run(&mut cpu, &[Instruction::SetRegToRand(Reg(4), Const(0xFF))]);
        assert_eq!(0xAB, reg(&cpu, 4));
    }

    #[test]
    fn draw_xors_and_reports_collisions() {
        let mut cpu = cpu();
        cpu.state_mut().write_memory(0x300, &[0b1000_0001]).unwrap();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(0), Const(2)),
            Instruction::SetRegToConst(Reg(1), Const(3)),
            Instruction::Draw(Reg(0), Reg(1), Const(1)),
        ]);
        assert_eq!(1, cpu.io().pixel(2, 3));
        assert_eq!(0, cpu.io().pixel(3, 3));
        assert_eq!(1, cpu.io().pixel(9, 3));
        assert_eq!(2, cpu.io().lit_pixels());
        assert_eq!(0, reg(&cpu, 0xF));

        run(&mut cpu, &[Instruction::Draw(Reg(0), Reg(1), Const(1))]);
        assert_eq!(0, cpu.io().lit_pixels());
        assert_eq!(1, reg(&cpu, 0xF));
    }

    #[test]
    fn draw_clips_at_the_right_edge() {
        let mut cpu = cpu();
        cpu.state_mut().write_memory(0x300, &[0xFF]).unwrap();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(0), Const(60)),
            Instruction::SetRegToConst(Reg(1), Const(0)),
            Instruction::Draw(Reg(0), Reg(1), Const(1)),
        ]);
        for x in 60..64 {
            assert_eq!(1, cpu.io().pixel(x, 0), "x = {}", x);
        }
        for x in 0..4 {
            assert_eq!(0, cpu.io().pixel(x, 0), "x = {}", x);
        }
        assert_eq!(4, cpu.io().lit_pixels());
    }

    #[test]
    fn draw_clips_at_the_bottom_edge() {
        let mut cpu = cpu();
        cpu.state_mut().write_memory(0x300, &[0x80, 0x80, 0x80]).unwrap();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(0), Const(0)),
            Instruction::SetRegToConst(Reg(1), Const(31)),
            Instruction::Draw(Reg(0), Reg(1), Const(3)),
        ]);
        assert_eq!(1, cpu.io().pixel(0, 31));
        assert_eq!(0, cpu.io().pixel(0, 0));
        assert_eq!(1, cpu.io().lit_pixels());
    }

    #[test]
    fn draw_origin_wraps() {
        let mut cpu = cpu();
        cpu.state_mut().write_memory(0x300, &[0x80]).unwrap();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(0), Const(64 + 5)),
            Instruction::SetRegToConst(Reg(1), Const(32 + 2)),
            Instruction::Draw(Reg(0), Reg(1), Const(1)),
        ]);
        assert_eq!(1, cpu.io().pixel(5, 2));
    }

    #[test]
    fn draw_respects_the_backend_display_size() {
        let mut cpu = Cpu::with_rng(HeadlessIo::with_size(10, 5), StepRng::new(0, 0));
        cpu.state_mut().write_memory(0x300, &[0xFF]).unwrap();
        cpu.execute_many(&[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(0), Const(16)),
            Instruction::Draw(Reg(0), Reg(1), Const(1)),
        ])
        .unwrap();
        // Origin wraps to x = 6, leaving room for four pixels
        assert_eq!(4, cpu.io().lit_pixels());
        assert_eq!(1, cpu.io().pixel(6, 0));
    }

    #[test]
    fn draw_reading_past_memory_faults() {
        let mut cpu = cpu();
        run(&mut cpu, &[Instruction::SetI(Addr(0xFFD))]);
        assert_eq!(
            Err(Error::MemoryOutOfBounds { address: 0xFFF }),
            cpu.execute(Instruction::Draw(Reg(0), Reg(0), Const(5)))
        );
    }

    #[test]
    fn clear_screen_clears_screen() {
        let mut cpu = cpu();
        cpu.io_mut().draw_pixel(0, 0, 1);
        run(&mut cpu, &[Instruction::ClearScreen]);
        assert_eq!(0, cpu.io().lit_pixels());
    }

    #[test]
    fn key_skips() {
        let mut cpu = cpu();
        cpu.io_mut().press(0xA);
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0xA)),
            Instruction::SetRegToConst(Reg(2), Const(0xB)),
            Instruction::SetRegToConst(Reg(3), Const(0x1A)),
        ]);

        let skip_cases = [
            (Instruction::SkipIfKeyPressed(Reg(1)), true),
            (Instruction::SkipIfKeyPressed(Reg(2)), false),
            (Instruction::SkipIfKeyPressed(Reg(3)), false),
            (Instruction::SkipIfKeyNotPressed(Reg(1)), false),
            (Instruction::SkipIfKeyNotPressed(Reg(2)), true),
            (Instruction::SkipIfKeyNotPressed(Reg(3)), true),
        ];

        for &(instruction, skips) in &skip_cases {
            cpu.state_mut().set_program_counter(0x200);
            cpu.execute(instruction).unwrap();
            let expected = if skips { 0x202 } else { 0x200 };
            assert_eq!(expected, cpu.state().program_counter(), "{}", instruction);
        }
    }

    #[test]
    fn wait_for_key_stores_the_key() {
        let mut cpu = cpu();
        cpu.io_mut().queue_key_press(0xC);
        run(&mut cpu, &[Instruction::WaitForKey(Reg(5))]);
        assert_eq!(0xC, reg(&cpu, 5));
    }

    #[test]
    fn timers_are_read_and_written() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(30)),
            Instruction::SetDelayTimerToReg(Reg(1)),
            Instruction::SetRegToConst(Reg(1), Const(40)),
            Instruction::SetSoundTimerToReg(Reg(1)),
        ]);
        assert_eq!(30, cpu.state().delay_timer());
        assert_eq!(40, cpu.state().sound_timer());

        cpu.state_mut().tick_timers();
        run(&mut cpu, &[Instruction::SetRegToDelayTimer(Reg(2))]);
        assert_eq!(29, reg(&cpu, 2));
    }

    #[test]
    fn glyph_address() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(0xF)),
            Instruction::SetIToGlyph(Reg(1)),
        ]);
        assert_eq!(FONT_OFFSET + 75, cpu.state().address_register());
    }

    #[test]
    fn bcd() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(1), Const(254)),
            Instruction::StoreBcd(Reg(1)),
        ]);
        assert_eq!(&[2u8, 5, 4][..], cpu.state().read_memory(0x300, 3).unwrap());

        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(1), Const(7)),
            Instruction::StoreBcd(Reg(1)),
        ]);
        assert_eq!(&[0u8, 0, 7][..], cpu.state().read_memory(0x300, 3).unwrap());
    }

    #[test]
    fn reg_dump_and_load_are_inclusive() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetI(Addr(0x300)),
            Instruction::SetRegToConst(Reg(0), Const(1)),
            Instruction::SetRegToConst(Reg(1), Const(2)),
            Instruction::SetRegToConst(Reg(2), Const(3)),
            Instruction::SetRegToConst(Reg(3), Const(4)),
            Instruction::RegDump(Reg(2)),
        ]);
        assert_eq!(&[1u8, 2, 3, 0][..], cpu.state().read_memory(0x300, 4).unwrap());
        assert_eq!(0x300, cpu.state().address_register());

        cpu.state_mut().write_memory(0x400, &[9, 8, 7]).unwrap();
        run(&mut cpu, &[Instruction::SetI(Addr(0x400)), Instruction::RegLoad(Reg(1))]);
        assert_eq!(&[9u8, 8, 3, 4][..], &cpu.state().registers()[..4]);
    }

    #[test]
    fn memory_transfers_past_the_end_fault_without_partial_writes() {
        let mut cpu = cpu();
        run(&mut cpu, &[
            Instruction::SetRegToConst(Reg(0), Const(1)),
            Instruction::SetRegToConst(Reg(1), Const(2)),
            Instruction::SetRegToConst(Reg(2), Const(123)),
            Instruction::SetI(Addr(0xFFD)),
        ]);
        let out_of_bounds = Err(Error::MemoryOutOfBounds { address: 0xFFF });

        // Three bytes starting two short of the end
        assert_eq!(out_of_bounds, cpu.execute(Instruction::StoreBcd(Reg(2))));
        assert_eq!(out_of_bounds, cpu.execute(Instruction::RegDump(Reg(2))));
        assert_eq!(&[0u8, 0][..], cpu.state().read_memory(0xFFD, 2).unwrap());

        cpu.state_mut().write_memory(0xFFD, &[9, 8]).unwrap();
        assert_eq!(out_of_bounds, cpu.execute(Instruction::RegLoad(Reg(2))));
        assert_eq!(&[1u8, 2, 123][..], &cpu.state().registers()[..3]);
        assert_eq!(0xFFD, cpu.state().address_register());

        // Two bytes still fit
        run(&mut cpu, &[Instruction::RegLoad(Reg(1))]);
        assert_eq!(&[9u8, 8, 123][..], &cpu.state().registers()[..3]);
    }

    #[test]
    fn reset_clears_display_and_state() {
        let mut cpu = cpu_with_program(&[0x00, 0xE0]);
        cpu.io_mut().draw_pixel(1, 1, 1);
        cpu.reset();
        assert_eq!(0, cpu.state().program_counter());
        assert_eq!(0, cpu.io().lit_pixels());
    }
}
