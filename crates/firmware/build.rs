use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    // Only run linker script setup for hardware builds
    if env::var_os("CARGO_FEATURE_HARDWARE").is_none() {
        return Ok(());
    }

    // Put `memory.x` in our output directory and ensure it's on the linker search path.
    let out = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?);
    fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))?;
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=../../memory.x");

    // cortex-m-rt and defmt linker scripts, firmware binary only.
    println!("cargo:rustc-link-arg-bin=firmware=--nmagic");
    println!("cargo:rustc-link-arg-bin=firmware=-Tlink.x");
    println!("cargo:rustc-link-arg-bin=firmware=-Tdefmt.x");

    Ok(())
}
