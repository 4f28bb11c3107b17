//! Small numeric and formatting helpers shared by the emulator.

pub mod bit_splitter;
pub mod format;
pub mod mask;
