//! SD WAV Player - Desktop Emulator
//!
//! Plays `<sd-root>/2.wav` through a paced null sink, then waits and exits
//! the way the board would restart.
//!
//! Run with: cargo run --bin wav-player-emulator --features emulator -- --sd-root ./sd

use std::convert::Infallible;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use firmware::emulator::{default_sd_root, HostI2s, HostSystem};
use firmware::{finish, run, AppContext};
use platform::config;
use platform::storage_local::LocalSdHost;

#[derive(Parser)]
#[command(name = "wav-player-emulator")]
#[command(about = "Run the SD WAV player against a host directory", long_about = None)]
#[command(version)]
struct Args {
    /// Directory standing in for the SD card's FAT volume.
    #[arg(long, env = "WAV_PLAYER_SD_ROOT")]
    sd_root: Option<PathBuf>,
    /// Feed the sink as fast as possible instead of in real time.
    #[arg(long)]
    no_pacing: bool,
    /// Write the PCM sent to I2S to this file.
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Scale the pre-restart wait, in percent.
    #[arg(long, default_value_t = 100)]
    delay_scale: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("{}", config::emulator_banner());

    let mut tx = HostI2s::new();
    if args.no_pacing {
        tx = tx.without_pacing();
    }
    if let Some(path) = &args.dump {
        tx = tx
            .dump_to(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    let ctx = AppContext {
        host: LocalSdHost::new(args.sd_root.unwrap_or_else(default_sd_root)),
        tx,
    };
    let mut system = HostSystem::new().with_delay_scale(args.delay_scale);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let never: Infallible = rt.block_on(async move { finish(run(ctx).await, &mut system).await });
    match never {}
}
