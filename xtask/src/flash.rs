use anyhow::{Context, Result};

use crate::{CHIP, TARGET};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// Path the firmware opens after mounting the card.
const CARD_FILE: &str = "/sdcard/2.wav";

pub fn run(release: bool) -> Result<()> {
    let profile = if release { "release" } else { "debug" };

    println!();
    println!("{}", format!("🔨 Building player firmware ({profile})").cyan().bold());

    let started = Instant::now();
    let mut build = Command::new("cargo");
    build.args(["build", "-p", "firmware", "--bin", "firmware"]);
    build.args(["--target", TARGET, "--features", "hardware"]);
    if release {
        build.arg("--release");
    }
    expect_success(
        build.output().context("Failed to run cargo build")?,
        "Build failed",
    )?;
    println!(
        "{}",
        format!("✓ Built in {:.2}s", started.elapsed().as_secs_f64()).green()
    );

    report_sections(release);

    println!();
    println!("{}", format!("📡 Flashing {CHIP} over SWD").cyan().bold());
    println!(
        "   {}",
        format!("The card must hold {CARD_FILE} (16-bit PCM, 44-byte header)").dimmed()
    );

    let started = Instant::now();
    let flash = Command::new("probe-rs")
        .arg("download")
        .arg(binary_path(release))
        .args(["--chip", CHIP])
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;
    expect_success(
        flash,
        "Flash failed - check that the probe is connected and the board is powered",
    )?;
    println!(
        "{}",
        format!("✓ Flashed in {:.2}s", started.elapsed().as_secs_f64()).green()
    );

    println!();
    println!(
        "   {}",
        format!("Watch RTT logs with 'probe-rs attach --chip {CHIP} {}'", binary_path(release))
            .dimmed()
    );
    println!();
    Ok(())
}

fn binary_path(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{TARGET}/{profile}/firmware")
}

fn expect_success(output: Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    eprintln!("{}", format!("✗ {what}").red().bold());
    eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    anyhow::bail!("{what}")
}

/// Prints the DMA-relevant sections (`.axisram` must be non-empty).
/// Missing `rust-size` only skips the report.
fn report_sections(release: bool) {
    let Ok(out) = Command::new("rust-size").arg("-A").arg(binary_path(release)).output() else {
        return;
    };
    if !out.status.success() {
        return;
    }
    let table = String::from_utf8_lossy(&out.stdout);
    println!("{}", "📊 Sections:".cyan());
    for line in table.lines().filter(|l| {
        [".text", ".data", ".bss", ".axisram"]
            .iter()
            .any(|s| l.starts_with(s))
    }) {
        println!("   {}", line.dimmed());
    }
}
