//! The CHIP-8 virtual machine: state, instruction set, CPU cycle and run loop.

pub mod cpu;
pub mod dump;
pub mod emulation;
pub mod error;
pub mod instruction;
pub mod io;
pub mod sprite;
pub mod state;

pub use cpu::Cpu;
pub use dump::Dump;
pub use emulation::{Crash, Emulation, Status};
pub use error::{Error, Result};
pub use instruction::Instruction;
pub use io::{EmulatorIo, HeadlessIo};
pub use state::MachineState;
