//! CMake configure and build.
//!
//! Drives the build step of the release pipeline: wipes the build tree,
//! configures the project, then builds each release target in order.
//! Targets build sequentially and the first failure aborts the run, so a
//! broken editor build never produces a shippable-looking archive.

use anyhow::{bail, Context, Result};
use std::fs;

use crate::config::ReleaseConfig;
use crate::process::{self, Cmd};

/// Build all configured targets from a clean build tree.
pub fn build_targets(config: &ReleaseConfig) -> Result<()> {
    println!("=== Building release targets ===\n");

    // Stage 1: Validate host and project
    check_host_tools()?;
    validate_project(config)?;

    // Stage 2: Start from a clean build tree
    clear_build_dir(config)?;

    // Stage 3: Configure
    configure(config)?;

    // Stage 4: Build every target, stopping at the first failure
    for target in &config.targets {
        build_target(config, target)?;
    }

    Ok(())
}

/// Stage 1: Check that the build tools are installed.
fn check_host_tools() -> Result<()> {
    if !process::exists("cmake") {
        bail!("cmake not found. Install: sudo dnf install cmake");
    }
    Ok(())
}

/// Stage 1: Check that the project root holds a CMake project.
fn validate_project(config: &ReleaseConfig) -> Result<()> {
    let cmakelists = config.project_root.join("CMakeLists.txt");
    if !cmakelists.exists() {
        bail!(
            "CMakeLists.txt not found at {}.\n\
             Run from the project root or pass --project-root.",
            cmakelists.display()
        );
    }
    Ok(())
}

/// Stage 2: Remove any previous build tree.
///
/// CMake recreates the directory during configure, so a missing tree is fine.
fn clear_build_dir(config: &ReleaseConfig) -> Result<()> {
    if config.build_dir.exists() {
        println!("Clearing build directory: {}", config.build_dir.display());
        fs::remove_dir_all(&config.build_dir)
            .with_context(|| format!("failed to clear {}", config.build_dir.display()))?;
    }
    Ok(())
}

/// Stage 3: Run the CMake configure step.
fn configure(config: &ReleaseConfig) -> Result<()> {
    println!("Configuring: {}", config.project_root.display());
    Cmd::new("cmake")
        .arg("-S")
        .arg_path(&config.project_root)
        .arg("-B")
        .arg_path(&config.build_dir)
        .error_msg("CMake configure failed. Fix the first error it reports and re-run.")
        .run_interactive()
}

/// Stage 4: Build a single target.
fn build_target(config: &ReleaseConfig, target: &str) -> Result<()> {
    println!("\nBuilding target '{}' ({})...", target, config.profile);
    Cmd::new("cmake")
        .arg("--build")
        .arg_path(&config.build_dir)
        .args(["--target", target, "--config", config.profile.as_str(), "-j"])
        .error_msg(&format!(
            "Target '{}' failed to build. Later targets were not attempted.",
            target
        ))
        .run_interactive()
}
