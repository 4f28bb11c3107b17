/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
You can then use the keys 0-9 and a-f to give input, but which ones to use depend on the CHIP-8 program.
Press `q` to quit.

There is also `no_frontend`, which runs a program without a terminal and prints the final screen.

# Library

The main way of running a program is to load it as bytes into an `Emulation`
and start it. It runs until the program crashes, and hands you a dump of the machine when it does.

```rust
use chip8_vm::emulator::{Emulation, Error, HeadlessIo, Status};

let mut emulation = Emulation::new(HeadlessIo::new());

// Load a program at address 0x200.
let program = [
    0x00, 0xE0, // CLS
    0x80, 0xF8, // Not an instruction
];
emulation.load(&program).unwrap();

let crash = emulation.start().unwrap_err();
assert_eq!(Status::Crashed, emulation.status());
assert_eq!(Error::UnknownInstruction(0x80F8), crash.error);
assert_eq!("0x0202", crash.dump.program_counter);
```

Alternatively, you can experiment by stepping a `Cpu` or executing instructions manually.

```rust
use chip8_vm::emulator::{Cpu, HeadlessIo};
use chip8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut cpu = Cpu::new(HeadlessIo::new());

// Execute instructions manually
cpu.execute(Instruction::ClearScreen).unwrap();

// Or many sequentially
cpu.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
]).unwrap();

assert_eq!(0x250, cpu.state().program_counter());
assert_eq!(35, cpu.state().register(0xB));
```

## Custom input and output

To draw somewhere and get keypresses, implement `EmulatorIo`,
which tells the CPU how to draw pixels, how to check the keypad and how to wait for a key.
Take a look at `src/emulator/io.rs` to see how to implement this, then do the following.

```ignore
use chip8_vm::emulator::Emulation;

let mut emulation = Emulation::new(MyIo::new());
```

Randomness is pluggable too, pass any `rand::Rng` to `Cpu::with_rng` and wrap it with `Emulation::with_cpu`.
*/

pub mod emulator;
pub mod util;
