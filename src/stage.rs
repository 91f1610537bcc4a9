//! Release staging - mirrors the staged package tree into the release directory.
//!
//! The build step leaves shippable files under `build/package/`. This module
//! replaces the release directory with an exact mirror of that tree and
//! drops any archive left over from a previous run.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::ReleaseConfig;

/// Totals accumulated while mirroring a tree.
#[derive(Default)]
struct MirrorStats {
    files: usize,
    dirs: usize,
    symlinks: usize,
}

/// Mirror `build/package/` into the release directory.
///
/// The previous release directory and archive are removed first, so the
/// result only ever contains files from the current build.
pub fn stage_release(config: &ReleaseConfig) -> Result<()> {
    println!("=== Staging release ===\n");

    // Stage 1: Validate inputs
    validate_staging(config)?;

    // Stage 2: Drop the previous release directory and archive
    clear_release(config)?;

    // Stage 3: Mirror the staged tree
    println!(
        "Copying {} -> {}",
        config.package_dir.display(),
        config.release_dir.display()
    );
    let mut stats = MirrorStats::default();
    copy_tree(&config.package_dir, &config.release_dir, &mut stats)?;

    print_stage_summary(config, &stats);
    Ok(())
}

/// Stage 1: Check that the build produced a staged tree.
fn validate_staging(config: &ReleaseConfig) -> Result<()> {
    if !config.package_dir.exists() {
        bail!(
            "Staged build output not found at {}.\n\
             Run 'relpack build' first.",
            config.package_dir.display()
        );
    }
    Ok(())
}

/// Stage 2: Remove the previous release directory and archive.
///
/// The archive may or may not exist, removal is best effort.
fn clear_release(config: &ReleaseConfig) -> Result<()> {
    if config.release_dir.exists() {
        println!("Clearing release directory: {}", config.release_dir.display());
        fs::remove_dir_all(&config.release_dir)
            .with_context(|| format!("failed to clear {}", config.release_dir.display()))?;
    }

    let _ = fs::remove_file(&config.archive_path);
    Ok(())
}

/// Copy a directory tree recursively, counting what was mirrored.
///
/// Symlinks are recreated pointing at their original target, not followed.
/// An existing file at a destination path is removed before the copy.
fn copy_tree(src: &Path, dst: &Path, stats: &mut MirrorStats) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_symlink() {
            let target = fs::read_link(&src_path)?;
            if dst_path.exists() || dst_path.is_symlink() {
                fs::remove_file(&dst_path)?;
            }
            std::os::unix::fs::symlink(&target, &dst_path)?;
            stats.symlinks += 1;
        } else if src_path.is_dir() {
            copy_tree(&src_path, &dst_path, stats)?;
            stats.dirs += 1;
        } else {
            if dst_path.exists() || dst_path.is_symlink() {
                fs::remove_file(&dst_path)?;
            }
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
            stats.files += 1;
        }
    }

    Ok(())
}

/// Print a summary of the staged release tree.
fn print_stage_summary(config: &ReleaseConfig, stats: &MirrorStats) {
    println!("\n=== Release tree staged ===");
    println!("  Output: {}", config.release_dir.display());
    println!("  Files: {}", stats.files);
    println!("  Directories: {}", stats.dirs);
    println!("  Symlinks: {}", stats.symlinks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed_package_dir(config: &ReleaseConfig) {
        fs::create_dir_all(config.package_dir.join("bin")).unwrap();
        fs::write(config.package_dir.join("bin/game"), "game binary").unwrap();
        fs::write(config.package_dir.join("readme.txt"), "read me").unwrap();
        std::os::unix::fs::symlink("bin/game", config.package_dir.join("latest")).unwrap();
    }

    #[test]
    fn test_stage_mirrors_tree() {
        let dir = tempdir().unwrap();
        let config = ReleaseConfig::new(dir.path());
        seed_package_dir(&config);

        stage_release(&config).unwrap();

        assert_eq!(
            fs::read_to_string(config.release_dir.join("bin/game")).unwrap(),
            "game binary"
        );
        assert_eq!(
            fs::read_to_string(config.release_dir.join("readme.txt")).unwrap(),
            "read me"
        );
        let link = config.release_dir.join("latest");
        assert!(link.is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), Path::new("bin/game"));
    }

    #[test]
    fn test_stage_missing_package_dir_is_error() {
        let dir = tempdir().unwrap();
        let config = ReleaseConfig::new(dir.path());

        let err = stage_release(&config).unwrap_err();
        assert!(err.to_string().contains("relpack build"));
    }

    #[test]
    fn test_stage_empty_package_dir_gives_empty_release() {
        let dir = tempdir().unwrap();
        let config = ReleaseConfig::new(dir.path());
        fs::create_dir_all(&config.package_dir).unwrap();

        stage_release(&config).unwrap();

        assert!(config.release_dir.is_dir());
        assert_eq!(fs::read_dir(&config.release_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_stage_replaces_previous_release() {
        let dir = tempdir().unwrap();
        let config = ReleaseConfig::new(dir.path());
        seed_package_dir(&config);

        fs::create_dir_all(&config.release_dir).unwrap();
        fs::write(config.release_dir.join("stale.dll"), "old").unwrap();
        fs::write(&config.archive_path, "old archive").unwrap();

        stage_release(&config).unwrap();

        assert!(!config.release_dir.join("stale.dll").exists());
        assert!(!config.archive_path.exists());
        assert!(config.release_dir.join("bin/game").exists());
    }

    #[test]
    fn test_copy_tree_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("config.ini"), "new").unwrap();
        fs::write(dst.join("config.ini"), "old").unwrap();

        copy_tree(&src, &dst, &mut MirrorStats::default()).unwrap();

        assert_eq!(fs::read_to_string(dst.join("config.ini")).unwrap(), "new");
    }

    #[test]
    fn test_mirror_counts_copied_entries() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("package");
        let dst = dir.path().join("release");
        fs::create_dir_all(src.join("assets")).unwrap();
        fs::write(src.join("assets/level1.dat"), "map").unwrap();
        fs::write(src.join("game"), "game binary").unwrap();
        fs::write(src.join("server"), "server binary").unwrap();
        std::os::unix::fs::symlink("game", src.join("run")).unwrap();

        let mut stats = MirrorStats::default();
        copy_tree(&src, &dst, &mut stats).unwrap();

        assert_eq!(stats.files, 3);
        assert_eq!(stats.dirs, 1);
        assert_eq!(stats.symlinks, 1);
    }
}
