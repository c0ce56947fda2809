use anyhow::{Context, Result};
use colored::Colorize;
use platform::config;
use std::path::Path;
use std::process::Command;

pub fn run(sd_root: &Path, no_pacing: bool, restart_loop: bool) -> Result<()> {
    println!();
    println!("{}", config::emulator_banner().cyan().bold());
    println!("   {}", format!("SD root: {}", sd_root.display()).dimmed());
    if !sd_root.join("2.wav").is_file() {
        println!(
            "   {}",
            format!("⚠ {} has no 2.wav; the run will fail and restart", sd_root.display())
                .yellow()
        );
    }
    println!();

    let mut runs = 0u32;
    loop {
        runs = runs.saturating_add(1);
        println!("{}", format!("▶ Run {runs}").bold());

        let mut cmd = Command::new("cargo");
        cmd.args([
            "run",
            "-p",
            "firmware",
            "--bin",
            "wav-player-emulator",
            "--features",
            "emulator",
            "--",
            "--sd-root",
        ])
        .arg(sd_root);
        if no_pacing {
            cmd.arg("--no-pacing");
        }

        let status = cmd.status().context("Failed to start the emulator")?;
        if !status.success() {
            anyhow::bail!("Emulator exited with {status}");
        }
        if !restart_loop {
            break;
        }
        println!("{}", "↻ Restarted".dimmed());
    }

    Ok(())
}
