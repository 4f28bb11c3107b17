use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use chip8_vm::emulator::{Cpu, Emulation};

mod crossterm_io;
mod key_buffer;
mod key_manager;

use crossterm_io::CrosstermIo;
use key_manager::KeyManager;

/// The delay and sound timers count down at this rate.
const TIMER_HZ: u64 = 60;

/// Play a CHIP-8 program in the terminal. Keys 0-9 and a-f form the keypad, q quits.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instructions executed per second
    #[structopt(long, default_value = "500")]
    hz: u64,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let cycle = Duration::from_micros(1_000_000 / opt.hz.max(1));
    let timer_period = Duration::from_micros(1_000_000 / TIMER_HZ);

    let key_manager = KeyManager::new();
    let mut emulation = Emulation::with_cpu(Cpu::with_rng(CrosstermIo::new(&key_manager)?, rng));
    emulation.load(&program)?;

    // Start execution
    let mut last_tick = Instant::now();
    let result = emulation.run_until(|cpu| {
        while last_tick.elapsed() >= timer_period {
            cpu.state_mut().tick_timers();
            last_tick += timer_period;
        }
        std::thread::sleep(cycle);
        cpu.io().quit_requested()
    });

    // Restore the terminal before reporting anything
    drop(emulation);

    match result {
        Ok(()) => {
            log::info!("Quit by user");
            Ok(())
        }
        Err(crash) => {
            eprintln!("{}", crash);
            std::process::exit(1);
        }
    }
}
