use std::fmt;

use super::error::{Error, Result};
use crate::util::bit_splitter::BitSplitter;
use crate::util::format::{hex, reg};

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Sys(Addr), // 0NNN, ignored
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    SkipIfRegEqConst(Reg, Const), // 3XNN
    SkipIfRegNeqConst(Reg, Const), // 4XNN
    SkipIfRegEqReg(Reg, Reg), // 5XY_
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg, Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg, Reg), // 8XYE
    SkipIfRegNeqReg(Reg, Reg), // 9XY_
    SetI(Addr), // ANNN
    GotoV0PlusAddr(Addr), // BNNN
    SetRegToRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    SkipIfKeyPressed(Reg), // EX9E
    SkipIfKeyNotPressed(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    WaitForKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToGlyph(Reg), // FX29
    StoreBcd(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
}

impl Instruction {
    /// Decode a raw instruction word.
    /// Words outside the instruction set give `Error::UnknownInstruction`.
    pub fn decode(value: u16) -> Result<Instruction> {
        use Instruction::*;

        let word = BitSplitter::from_u16(value);
        let addr = Addr(word.nnn());
        let x = Reg(word.x());
        let y = Reg(word.y());
        let kk = Const(word.kk());

        let instruction = match word.as_four_u8() {
            (0, 0, 0xE, 0) => ClearScreen,
            (0, 0, 0xE, 0xE) => Return,
            (0, _, _, _) => Sys(addr),
            (1, _, _, _) => Goto(addr),
            (2, _, _, _) => Call(addr),
            (3, _, _, _) => SkipIfRegEqConst(x, kk),
            (4, _, _, _) => SkipIfRegNeqConst(x, kk),
            (5, _, _, _) => SkipIfRegEqReg(x, y),
            (6, _, _, _) => SetRegToConst(x, kk),
            (7, _, _, _) => IncRegByConst(x, kk),
            (8, _, _, 0) => SetRegToReg(x, y),
            (8, _, _, 1) => BitwiseOr(x, y),
            (8, _, _, 2) => BitwiseAnd(x, y),
            (8, _, _, 3) => BitwiseXor(x, y),
            (8, _, _, 4) => IncRegByReg(x, y),
            (8, _, _, 5) => DecRegByReg(x, y),
            (8, _, _, 6) => BitshiftRight(x, y),
            (8, _, _, 7) => SetVxVyMinusVx(x, y),
            (8, _, _, 0xE) => BitshiftLeft(x, y),
            (9, _, _, _) => SkipIfRegNeqReg(x, y),
            (0xA, _, _, _) => SetI(addr),
            (0xB, _, _, _) => GotoV0PlusAddr(addr),
            (0xC, _, _, _) => SetRegToRand(x, kk),
            (0xD, _, _, n) => Draw(x, y, Const(n)),
            (0xE, _, 9, 0xE) => SkipIfKeyPressed(x),
            (0xE, _, 0xA, 1) => SkipIfKeyNotPressed(x),
            (0xF, _, 0, 7) => SetRegToDelayTimer(x),
            (0xF, _, 0, 0xA) => WaitForKey(x),
            (0xF, _, 1, 5) => SetDelayTimerToReg(x),
            (0xF, _, 1, 8) => SetSoundTimerToReg(x),
            (0xF, _, 1, 0xE) => AddRegToI(x),
            (0xF, _, 2, 9) => SetIToGlyph(x),
            (0xF, _, 3, 3) => StoreBcd(x),
            (0xF, _, 5, 5) => RegDump(x),
            (0xF, _, 6, 5) => RegLoad(x),
            _ => return Err(Error::UnknownInstruction(value)),
        };

        Ok(instruction)
    }
}

/// Assembly-style description, e.g. `LD V1, 0x2A`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        let a = |Addr(addr): Addr| hex(addr as u32, 3);
        let r = |Reg(x): Reg| reg(x);
        let c = |Const(n): Const| hex(n as u32, 2);

        match *self {
            Sys(addr) => write!(f, "SYS {}", a(addr)),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Goto(addr) => write!(f, "JP {}", a(addr)),
            Call(addr) => write!(f, "CALL {}", a(addr)),
            SkipIfRegEqConst(x, kk) => write!(f, "SE {}, {}", r(x), c(kk)),
            SkipIfRegNeqConst(x, kk) => write!(f, "SNE {}, {}", r(x), c(kk)),
            SkipIfRegEqReg(x, y) => write!(f, "SE {}, {}", r(x), r(y)),
            SetRegToConst(x, kk) => write!(f, "LD {}, {}", r(x), c(kk)),
            IncRegByConst(x, kk) => write!(f, "ADD {}, {}", r(x), c(kk)),
            SetRegToReg(x, y) => write!(f, "LD {}, {}", r(x), r(y)),
            BitwiseOr(x, y) => write!(f, "OR {}, {}", r(x), r(y)),
            BitwiseAnd(x, y) => write!(f, "AND {}, {}", r(x), r(y)),
            BitwiseXor(x, y) => write!(f, "XOR {}, {}", r(x), r(y)),
            IncRegByReg(x, y) => write!(f, "ADD {}, {}", r(x), r(y)),
            DecRegByReg(x, y) => write!(f, "SUB {}, {}", r(x), r(y)),
            BitshiftRight(x, y) => write!(f, "SHR {} {{, {}}}", r(x), r(y)),
            SetVxVyMinusVx(x, y) => write!(f, "SUBN {}, {}", r(x), r(y)),
            BitshiftLeft(x, y) => write!(f, "SHL {} {{, {}}}", r(x), r(y)),
            SkipIfRegNeqReg(x, y) => write!(f, "SNE {}, {}", r(x), r(y)),
            SetI(addr) => write!(f, "LD I, {}", a(addr)),
            GotoV0PlusAddr(addr) => write!(f, "JP V0, {}", a(addr)),
            SetRegToRand(x, kk) => write!(f, "RND {}, {}", r(x), c(kk)),
            Draw(x, y, Const(n)) => write!(f, "DRW {}, {}, {}", r(x), r(y), hex(n as u32, 1)),
            SkipIfKeyPressed(x) => write!(f, "SKP {}", r(x)),
            SkipIfKeyNotPressed(x) => write!(f, "SKNP {}", r(x)),
            SetRegToDelayTimer(x) => write!(f, "LD {}, DT", r(x)),
            WaitForKey(x) => write!(f, "LD {}, K", r(x)),
            SetDelayTimerToReg(x) => write!(f, "LD DT, {}", r(x)),
            SetSoundTimerToReg(x) => write!(f, "LD ST, {}", r(x)),
            AddRegToI(x) => write!(f, "ADD I, {}", r(x)),
            SetIToGlyph(x) => write!(f, "LD F, {}", r(x)),
            StoreBcd(x) => write!(f, "LD B, {}", r(x)),
            RegDump(x) => write!(f, "LD [I], {}", r(x)),
            RegLoad(x) => write!(f, "LD {}, [I]", r(x)),
        }
    }
}
