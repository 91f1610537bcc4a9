//! Release packager CLI
//!
//! Builds the game's CMake targets in Release configuration, mirrors the
//! staged package tree into release/ and zips the result into release.zip.
//!
//! # Usage
//!
//! ```bash
//! # Full pipeline: build + stage + archive
//! relpack
//!
//! # Build the game, server and editor targets
//! relpack build
//!
//! # Build a subset of targets
//! relpack build --target game --target server
//!
//! # Mirror build/package into release/
//! relpack stage
//!
//! # Zip release/ into release.zip
//! relpack archive
//!
//! # Show pipeline status
//! relpack status
//!
//! # Run against another checkout
//! relpack -C ../game-main
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "relpack")]
#[command(author, version, about = "Release packager for the game", long_about = None)]
struct Cli {
    /// Project root containing the top-level CMakeLists.txt
    #[arg(short = 'C', long, default_value = ".", global = true)]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the release targets from a clean build tree
    Build {
        /// Build only this target (repeatable; default: game, server, editor)
        #[arg(long = "target", value_name = "NAME")]
        targets: Vec<String>,
    },

    /// Mirror build/package into the release directory
    Stage,

    /// Zip the release directory into release.zip
    Archive,

    /// Show pipeline status and next steps
    Status,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Build { targets }) => cmd_build(&cli.project_root, targets),
        Some(Commands::Stage) => cmd_stage(&cli.project_root),
        Some(Commands::Archive) => cmd_archive(&cli.project_root),
        Some(Commands::Status) => cmd_status(&cli.project_root),
        None => cmd_release(&cli.project_root),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn cmd_release(project_root: &Path) -> Result<()> {
    use std::time::Instant;

    let config = relpack::config::ReleaseConfig::new(project_root);
    let start = Instant::now();

    println!("=== Full Release ===\n");

    relpack::build::build_targets(&config)?;
    println!();
    relpack::stage::stage_release(&config)?;
    println!();
    relpack::archive::create_archive(&config)?;

    let total = start.elapsed().as_secs_f64();
    if total >= 60.0 {
        println!("\n=== Release Complete ({:.1}m) ===", total / 60.0);
    } else {
        println!("\n=== Release Complete ({:.1}s) ===", total);
    }
    println!("  Archive: {}", config.archive_path.display());

    Ok(())
}

fn cmd_build(project_root: &Path, targets: Vec<String>) -> Result<()> {
    let config = if targets.is_empty() {
        relpack::config::ReleaseConfig::new(project_root)
    } else {
        relpack::config::ReleaseConfig::with_targets(project_root, targets)
    };

    relpack::build::build_targets(&config)?;

    println!("\nNext: relpack stage");
    Ok(())
}

fn cmd_stage(project_root: &Path) -> Result<()> {
    let config = relpack::config::ReleaseConfig::new(project_root);
    relpack::stage::stage_release(&config)?;

    println!("\nNext: relpack archive");
    Ok(())
}

fn cmd_archive(project_root: &Path) -> Result<()> {
    let config = relpack::config::ReleaseConfig::new(project_root);
    relpack::archive::create_archive(&config)
}

fn cmd_status(project_root: &Path) -> Result<()> {
    use relpack::process;
    use relpack::process::Cmd;

    let config = relpack::config::ReleaseConfig::new(project_root);

    println!("Release Pipeline Status");
    println!("=======================");
    println!();
    println!("Configuration:");
    println!("  Project root: {}", config.project_root.display());
    println!("  Profile:      {}", config.profile);
    println!("  Targets:      {}", config.targets.join(", "));
    println!();

    println!("Host Tools:");
    match process::which("cmake") {
        Some(path) => {
            println!("  cmake:        FOUND at {}", path);
            if let Ok(result) = Cmd::new("cmake").arg("--version").allow_fail().run() {
                if result.success() {
                    if let Some(line) = result.stdout.lines().next() {
                        println!("  Version:      {}", line.trim());
                    }
                }
            }
        }
        None => println!("  cmake:        NOT FOUND (install cmake)"),
    }
    println!();

    let cmakelists = config.project_root.join("CMakeLists.txt");
    println!("Project:");
    if cmakelists.exists() {
        println!("  CMakeLists:   FOUND at {}", cmakelists.display());
    } else {
        println!("  CMakeLists:   NOT FOUND at {}", cmakelists.display());
    }
    println!();

    println!("Build Artifacts:");
    if config.build_dir.exists() {
        println!("  Build tree:   PRESENT at {}", config.build_dir.display());
    } else {
        println!("  Build tree:   NOT BUILT");
    }
    if config.package_dir.exists() {
        println!("  Staged tree:  PRESENT at {}", config.package_dir.display());
    } else {
        println!("  Staged tree:  NOT BUILT");
    }
    if config.release_dir.exists() {
        println!("  Release tree: PRESENT at {}", config.release_dir.display());
    } else {
        println!("  Release tree: NOT STAGED");
    }
    if config.archive_path.exists() {
        let size = std::fs::metadata(&config.archive_path)
            .map(|m| m.len() / 1024 / 1024)
            .unwrap_or(0);
        println!("  Archive:      BUILT ({} MB)", size);
    } else {
        println!("  Archive:      NOT BUILT");
    }
    println!();

    println!("Next steps:");
    if !cmakelists.exists() {
        println!("  1. Run inside the project root or pass --project-root");
    } else if !config.package_dir.exists() {
        println!("  1. Run 'relpack build' to build the release targets");
    } else if !config.release_dir.exists() {
        println!("  1. Run 'relpack stage' to mirror the staged tree");
    } else if !config.archive_path.exists() {
        println!("  1. Run 'relpack archive' to create the zip");
    } else {
        println!("  Archive ready! Ship {}", config.archive_path.display());
    }

    Ok(())
}
