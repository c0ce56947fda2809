use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

use crate::TARGET;

struct Step {
    label: &'static str,
    args: &'static [&'static str],
    /// A failing advisory step is reported but does not fail the run.
    advisory: bool,
}

const STEPS: &[Step] = &[
    Step {
        label: "hardware target (STM32H7)",
        args: &["check", "-p", "firmware", "--target", TARGET, "--features", "hardware"],
        advisory: false,
    },
    Step {
        label: "emulator target (host)",
        args: &["check", "-p", "firmware", "--features", "emulator"],
        advisory: false,
    },
    Step {
        label: "platform crate (no_std)",
        args: &["check", "-p", "platform", "--target", TARGET, "--no-default-features"],
        advisory: false,
    },
    Step {
        label: "playback crate (no_std)",
        args: &["check", "-p", "playback", "--target", TARGET, "--no-default-features"],
        advisory: false,
    },
    Step {
        label: "clippy lints",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        advisory: true,
    },
    Step {
        label: "code formatting",
        args: &["fmt", "--all", "--check"],
        advisory: true,
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking firmware builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        println!("{}", format!("  Checking {}...", step.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(step.args)
            .output()
            .with_context(|| format!("Failed to run cargo for {}", step.label))?;

        if output.status.success() {
            println!(
                "{}",
                format!(
                    "  ✓ {} passed in {:.2}s",
                    step.label,
                    start.elapsed().as_secs_f64()
                )
                .green()
            );
        } else if step.advisory {
            eprintln!("{}", format!("  ⚠ {} reported issues", step.label).yellow().bold());
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        } else {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
