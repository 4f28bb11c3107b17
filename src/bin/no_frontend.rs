use std::error::Error;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use chip8_vm::emulator::{Cpu, Emulation, HeadlessIo};

/// Run a program without a screen, then print what it drew.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Stop after this many cycles
    #[structopt(long, default_value = "10000")]
    cycles: u64,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,

    /// Hex keys handed out in order whenever the program waits for a key
    #[structopt(long, parse(try_from_str = parse_key))]
    keys: Vec<u8>,
}

fn parse_key(s: &str) -> Result<u8, String> {
    match u8::from_str_radix(s, 16) {
        Ok(key) if key <= 0xF => Ok(key),
        _ => Err(format!("{:?} is not a key, expected 0-f", s)),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut io = HeadlessIo::new();
    for &key in &opt.keys {
        io.queue_key_press(key);
    }
    let rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Load instructions into emulator memory
    let mut emulation = Emulation::with_cpu(Cpu::with_rng(io, rng));
    emulation.load(&program)?;

    // Start execution
    let budget = opt.cycles;
    let mut cycles = 0;
    let result = emulation.run_until(|_| {
        cycles += 1;
        cycles > budget
    });

    print!("{}", emulation.cpu().io());

    match result {
        Ok(()) => {
            log::info!("Stopped after {} cycles", budget);
            println!("{}", emulation.dump());
            Ok(())
        }
        Err(crash) => {
            eprintln!("{}", crash);
            std::process::exit(1);
        }
    }
}
