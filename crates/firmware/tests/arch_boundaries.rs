//! Architecture boundary tests. Run with `cargo test -p firmware --test arch_boundaries`
// Architecture test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
//!
//! Layering rules:
//!   Rule 1: platform (HAL traits) must not depend on embassy, firmware or playback
//!   Rule 2: playback (streaming core) must not depend on embassy or firmware
//!   Rule 3: hardware-only code stays behind the `hardware` feature
//!   Rule 4: the SAI DMA ring lives in AXI SRAM
//!
//! Most checks read manifests and sources with `include_str!`; a rename that
//! breaks a rule fails the build of this test binary or its assertions.

fn dependency_names(manifest: &str) -> Vec<&str> {
    let mut in_deps = false;
    let mut names = Vec::new();
    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if in_deps && !line.starts_with('#') {
            if let Some((name, _)) = line.split_once('=') {
                names.push(name.trim());
            }
        }
    }
    names
}

#[test]
fn platform_depends_on_no_runtime_or_app_crate() {
    let deps = dependency_names(include_str!("../../platform/Cargo.toml"));
    for dep in &deps {
        assert!(
            !dep.starts_with("embassy") && *dep != "firmware" && *dep != "playback",
            "platform must stay a trait layer, found dependency `{dep}`"
        );
    }
}

#[test]
fn playback_depends_only_on_platform_traits() {
    let deps = dependency_names(include_str!("../../playback/Cargo.toml"));
    assert!(deps.contains(&"platform"));
    for dep in &deps {
        assert!(
            !dep.starts_with("embassy") && *dep != "firmware" && !dep.starts_with("embedded-sdmmc"),
            "playback must not reach a concrete HAL, found dependency `{dep}`"
        );
    }
}

#[test]
fn platform_hal_traits_are_reachable() {
    // If this compiles, the trait seams used by firmware are exported.
    fn _tx<T: platform::I2sTx>() {}
    fn _host<T: platform::SdSpiHost>() {}
    fn _storage<T: platform::Storage>() {}
    fn _system<T: platform::SystemControl>() {}
}

#[test]
fn hardware_modules_are_feature_gated() {
    let lib_rs = include_str!("../src/lib.rs");
    assert!(lib_rs.contains("#[cfg(feature = \"hardware\")]\npub mod hardware;"));
    assert!(lib_rs.contains("#[cfg(feature = \"emulator\")]\npub mod emulator;"));
}

#[test]
fn firmware_binary_requires_hardware_feature() {
    let cargo = include_str!("../Cargo.toml");
    let bin = cargo.split("[[bin]]").nth(1).unwrap();
    assert!(bin.contains("path = \"src/main.rs\""));
    assert!(bin.contains("required-features = [\"hardware\"]"));
}

#[test]
fn time_driver_is_explicit_tim2() {
    let workspace = include_str!("../../../Cargo.toml");
    assert!(workspace.contains("time-driver-tim2"));
    assert!(!workspace.contains("time-driver-any"));
}

#[test]
fn main_uses_board_clock_config() {
    let main_rs = include_str!("../src/main.rs");
    assert!(main_rs.contains("embassy_stm32::init(build_embassy_config())"));
    assert!(!main_rs.contains("Config::default()"));

    // FRACN and the SAI1 kernel mux are set right after init, before the SAI is built.
    let init = main_rs.find("embassy_stm32::init").unwrap();
    let fracn = main_rs.find("apply_pll3_fracn();").unwrap();
    let mux = main_rs.find("select_sai1_kernel_clock();").unwrap();
    let sai = main_rs.find("SaiTx::new").unwrap();
    assert!(init < fracn && fracn < sai);
    assert!(init < mux && mux < sai);
}

#[test]
fn sai_kernel_clock_is_pll3_p() {
    let hw = include_str!("../src/hardware/mod.rs");
    // The embassy `Config` of the pinned release has no kernel mux; SAI1SEL
    // is written through the PAC or it stays on PLL1_Q.
    assert!(!hw.contains("rcc.mux"));
    assert!(hw.contains("RCC.d2ccip1r().modify(|w| w.set_sai1sel(Saisel::PLL3_P))"));
    assert!(hw.contains("MUL45"));
    assert!(hw.contains("DIV16"));
}

#[test]
fn sai_driver_type_names_its_dma_stream() {
    let sai_rs = include_str!("../src/hardware/sai.rs");
    let hw = include_str!("../src/hardware/mod.rs");
    assert!(sai_rs.contains("type SaiBlock = Sai<'static, SAI1, DMA1_CH0, u16>;"));
    assert!(hw.contains("pub DMA: DMA1_CH0,"));
}

#[test]
fn sd_file_borrows_volume_manager_mutably() {
    let sd_rs = include_str!("../src/hardware/sd_spi.rs");
    assert!(sd_rs.contains("volumes: &'a mut Volumes,"));
    assert!(sd_rs.contains("fn open_raw(&mut self"));
    assert!(sd_rs.contains("let mut volumes = VolumeManager::new"));
    assert!(!sd_rs.contains("&'a Volumes"));
}

#[test]
fn log_macros_are_textually_scoped() {
    let lib_rs = include_str!("../src/lib.rs");
    let fmt_rs = include_str!("../src/fmt.rs");
    let macro_use = lib_rs.find("#[macro_use]\nmod fmt;").unwrap();
    let first_mod = lib_rs.find("pub mod ").unwrap();
    assert!(macro_use < first_mod, "fmt must be declared before every other module");
    // A `use` re-export of `warn` is ambiguous with the built-in attribute.
    assert!(!fmt_rs.contains("pub(crate) use {"));
}

#[test]
fn sai_ring_declared_in_axisram() {
    let main_rs = include_str!("../src/main.rs");
    let link = main_rs.find(r#"link_section = ".axisram""#).unwrap();
    let decl = main_rs.find("static mut SAI_RING").unwrap();
    assert!(
        decl > link && decl - link < 100,
        "#[link_section = \".axisram\"] must sit directly on SAI_RING"
    );
    assert!(main_rs.contains("AXI_SRAM_BASE"), "runtime address check missing");
    assert!(main_rs.contains("defmt::panic!(\"SAI ring at"));
    assert!(!main_rs.contains("    assert!("), "bare assert in firmware entry point");
}

#[test]
fn sai_ring_type_is_dma_accessible() {
    let sai_rs = include_str!("../src/hardware/sai.rs");
    assert!(sai_rs.contains("DmaBuffer<AxiSramRegion, [u16; SAI_DMA_RING_WORDS]>"));
}

#[test]
fn memory_x_has_axisram_section() {
    let memory_x = include_str!("../../../memory.x");
    assert!(memory_x.contains("AXISRAM  : ORIGIN = 0x24000000, LENGTH = 512K"));
    assert!(memory_x.contains(".axisram (NOLOAD)"));
    assert!(memory_x.contains("} > AXISRAM"));
}

#[test]
fn memory_x_keeps_stack_in_dtcm() {
    let memory_x = include_str!("../../../memory.x");
    assert!(memory_x.contains("RAM      : ORIGIN = 0x20000000"));
}

#[test]
fn probe_rs_runner_targets_h743() {
    let config = include_str!("../../../.cargo/config.toml");
    assert!(config.contains("probe-rs run --chip STM32H743ZITx"));
    assert!(config.contains("DEFMT_LOG"));
}
