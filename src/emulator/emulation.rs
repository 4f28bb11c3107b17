//! Running a program until it crashes or the host stops it.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;

use super::cpu::Cpu;
use super::dump::Dump;
use super::error::{Error, Result};
use super::io::EmulatorIo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Halted,
    Running,
    Crashed,
}

/// Why and where a program stopped for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crash {
    pub error: Error,
    pub dump: Dump,
}

impl fmt::Display for Crash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crashed: {}", self.error)?;
        write!(f, "{}", self.dump)
    }
}

impl std::error::Error for Crash {}

/// Drives a `Cpu` through the `Halted -> Running -> Crashed` life cycle.
pub struct Emulation<IO: EmulatorIo, R: Rng = StdRng> {
    status: Status,
    cpu: Cpu<IO, R>,
    crash: Option<Crash>,
}

impl<IO: EmulatorIo> Emulation<IO, StdRng> {
    pub fn new(io: IO) -> Emulation<IO, StdRng> {
        Emulation::with_cpu(Cpu::new(io))
    }
}

impl<IO: EmulatorIo, R: Rng> Emulation<IO, R> {
    /// Wrap an existing CPU. It is reset first.
    pub fn with_cpu(mut cpu: Cpu<IO, R>) -> Emulation<IO, R> {
        cpu.reset();
        Emulation {
            status: Status::Halted,
            cpu,
            crash: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The crash that ended the last run, if any.
    pub fn crash(&self) -> Option<&Crash> {
        self.crash.as_ref()
    }

    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.cpu.load(program)
    }

    /// Reset the CPU and return to `Halted`. This is the only way out of `Crashed`.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.crash = None;
        self.status = Status::Halted;
    }

    pub fn dump(&self) -> Dump {
        self.cpu.dump()
    }

    pub fn cpu(&self) -> &Cpu<IO, R> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<IO, R> {
        &mut self.cpu
    }

    /// Run until the program crashes.
    /// Does nothing unless the emulation is `Halted`.
    pub fn start(&mut self) -> std::result::Result<(), Crash> {
        self.run_until(|_| false)
    }

    /// Run until the program crashes or `stop` returns true.
    /// `stop` is consulted before every cycle; stopping returns the emulation to `Halted`.
    /// Does nothing unless the emulation is `Halted`.
    pub fn run_until<F>(&mut self, mut stop: F) -> std::result::Result<(), Crash>
    where
        F: FnMut(&mut Cpu<IO, R>) -> bool,
    {
        if self.status != Status::Halted {
            return Ok(());
        }

        self.status = Status::Running;
        log::debug!("Running from {:#06X}", self.cpu.state().program_counter());

        while self.status == Status::Running {
            if stop(&mut self.cpu) {
                log::debug!("Stopped at {:#06X}", self.cpu.state().program_counter());
                self.status = Status::Halted;
                break;
            }

            if let Err(error) = self.cpu.step() {
                return Err(self.handle_crash(error));
            }
        }

        Ok(())
    }

    fn handle_crash(&mut self, error: Error) -> Crash {
        self.status = Status::Crashed;

        let crash = Crash {
            error,
            dump: self.cpu.dump(),
        };
        log::error!("{}", crash);

        self.crash = Some(crash.clone());
        crash
    }
}
