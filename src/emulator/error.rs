use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("program is too large ({size} bytes), at most {capacity} bytes fit in memory")]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error("unknown instruction {0:#06X}")]
    UnknownInstruction(u16),

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow when calling {address:#05X}")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,
}

pub type Result<T> = std::result::Result<T, Error>;
