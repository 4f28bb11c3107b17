use std::fmt;

use super::state::MachineState;
use crate::util::format::{hex, pad, reg};

/// A printable snapshot of the machine state, taken when a program crashes or on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    /// `0x0200`
    pub program_counter: String,
    /// `0x00`
    pub stack_pointer: String,
    /// One `i: 0x0000` entry per stack slot
    pub stack: Vec<String>,
    /// One `Vx=0xNN` entry per register
    pub registers: Vec<String>,
    /// Hex bytes up to the last non-zero byte, then a note on how many were left out
    pub memory: String,
}

impl Dump {
    pub fn capture(state: &MachineState) -> Dump {
        let stack = state
            .stack()
            .iter()
            .enumerate()
            .map(|(idx, &addr)| format!("{}: {}", pad(&idx.to_string(), 2, ' '), hex(addr as u32, 4)))
            .collect();

        let registers = state
            .registers()
            .iter()
            .enumerate()
            .map(|(idx, &value)| format!("{}={}", reg(idx as u8), hex(value as u32, 2)))
            .collect();

        Dump {
            program_counter: hex(state.program_counter() as u32, 4),
            stack_pointer: hex(state.stack_pointer() as u32, 2),
            stack,
            registers,
            memory: memory_dump(state.memory()),
        }
    }
}

fn memory_dump(memory: &[u8]) -> String {
    let used = memory
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |last| last + 1);

    let mut dump = memory[..used]
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(" ");

    let truncated = memory.len() - used;
    if truncated > 0 {
        if !dump.is_empty() {
            dump.push(' ');
        }
        dump.push_str(&format!("...{} empty bytes truncated...", truncated));
    }

    dump
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PC: {}", self.program_counter)?;
        writeln!(f, "SP: {}", self.stack_pointer)?;
        writeln!(f, "Stack:")?;
        for entry in &self.stack {
            writeln!(f, "  {}", entry)?;
        }
        writeln!(f, "Registers: {}", self.registers.join(" "))?;
        write!(f, "Memory: {}", self.memory)
    }
}
