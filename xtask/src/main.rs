// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod emulate;
mod flash;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Target triple of the STM32H743ZI build.
pub const TARGET: &str = "thumbv7em-none-eabihf";

/// probe-rs chip name.
pub const CHIP: &str = "STM32H743ZITx";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "SD WAV player development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash firmware to STM32H7 hardware via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Run the desktop emulator against a host directory
    Emulate {
        /// Directory standing in for the SD card
        #[arg(long, default_value = "sd")]
        sd_root: std::path::PathBuf,
        /// Do not pace writes to real time
        #[arg(long)]
        no_pacing: bool,
        /// Start a new run every time the emulator restarts
        #[arg(long = "loop")]
        restart_loop: bool,
    },
    /// Check firmware builds for both hardware and emulator targets
    Check,
    /// Run all tests (unit, integration, and emulator)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Emulate {
            sd_root,
            no_pacing,
            restart_loop,
        } => emulate::run(&sd_root, no_pacing, restart_loop),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
