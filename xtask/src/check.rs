use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Xtensa target of the classic ESP32. Needs the `esp` toolchain from espup.
const ESP32_TARGET: &str = "xtensa-esp32-none-elf";

/// What a failed step does to the overall result.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    Abort,
    Warn,
}

/// Run one cargo invocation, print a pass/fail line and its stderr on failure.
fn step(label: &str, args: &[&str], on_failure: OnFailure) -> Result<()> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
        println!();
        return Ok(());
    }

    match on_failure {
        OnFailure::Abort => {
            eprintln!("{}", format!("  ✗ {label} failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{label} failed");
        }
        OnFailure::Warn => {
            eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            println!();
            Ok(())
        }
    }
}

pub fn run(host_only: bool) -> Result<()> {
    println!();
    println!("{}", "🔍 Checking driver builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: Host build with the tracing backend and mocks
    step(
        "Checking host build (tracing, mocks)",
        &["check", "--workspace", "--all-targets", "--features", "fastdac/tracing,fastdac/std"],
        OnFailure::Abort,
    )?;

    // Check 2: ESP32 target, no_std with volatile MMIO and defmt
    if host_only {
        println!("{}", "  ⚠ Skipping ESP32 target check (--host-only)".yellow());
        println!();
    } else {
        step(
            "Checking ESP32 target (no_std, hardware, defmt)",
            &[
                "+esp",
                "check",
                "-p",
                "fastdac",
                "--target",
                ESP32_TARGET,
                "-Zbuild-std=core",
                "--features",
                "hardware,defmt",
            ],
            OnFailure::Abort,
        )?;
    }

    // Check 3: Clippy lints. Reported, not fatal.
    step(
        "Running clippy lints",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;

    // Check 4: Format check. Reported, not fatal.
    step(
        "Checking code formatting",
        &["fmt", "--all", "--check"],
        OnFailure::Warn,
    )?;

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
