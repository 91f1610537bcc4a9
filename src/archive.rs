//! Archive creation - zips the release directory.
//!
//! Produces `release.zip` next to the release directory. Entry names are
//! relative to the release directory, so unzipping in place recreates the
//! same tree. Directories get explicit entries, file modes are preserved
//! and symlinks are stored as symlink entries rather than followed.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ReleaseConfig;

/// Zip the release directory into the configured archive path.
///
/// An existing archive is overwritten. An empty release directory yields a
/// valid archive with zero entries.
pub fn create_archive(config: &ReleaseConfig) -> Result<()> {
    println!("=== Creating release archive ===\n");

    validate_release(config)?;

    println!(
        "Zipping {} -> {}",
        config.release_dir.display(),
        config.archive_path.display()
    );

    let file = fs::File::create(&config.archive_path)
        .with_context(|| format!("failed to create {}", config.archive_path.display()))?;
    let mut zip = ZipWriter::new(file);

    let mut files = 0;
    let mut dirs = 0;
    let mut symlinks = 0;

    for entry in WalkDir::new(&config.release_dir) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(&config.release_dir)?;
        if rel.as_os_str().is_empty() {
            continue;
        }

        let name = rel.to_string_lossy().into_owned();
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            let target = fs::read_link(entry.path())?;
            let options = SimpleFileOptions::default();
            zip.add_symlink(name, target.to_string_lossy().into_owned(), options)?;
            symlinks += 1;
        } else if file_type.is_dir() {
            let mode = entry.metadata()?.permissions().mode() & 0o777;
            zip.add_directory(name, deflate_options(mode))?;
            dirs += 1;
        } else {
            let mode = entry.metadata()?.permissions().mode() & 0o777;
            zip.start_file(name, deflate_options(mode))?;
            let mut src = fs::File::open(entry.path())
                .with_context(|| format!("failed to open {}", entry.path().display()))?;
            io::copy(&mut src, &mut zip)?;
            files += 1;
        }
    }

    zip.finish()
        .with_context(|| format!("failed to finish {}", config.archive_path.display()))?;

    print_archive_summary(config, files, dirs, symlinks);
    Ok(())
}

/// Deflate entry options carrying the on-disk unix mode.
fn deflate_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
}

/// Check that the release directory exists before zipping.
fn validate_release(config: &ReleaseConfig) -> Result<()> {
    if !config.release_dir.is_dir() {
        bail!(
            "Release tree not found at {}.\n\
             Run 'relpack stage' first.",
            config.release_dir.display()
        );
    }
    Ok(())
}

/// Print summary after archive creation.
fn print_archive_summary(config: &ReleaseConfig, files: usize, dirs: usize, symlinks: usize) {
    println!("\n=== Release archive created ===");
    println!("  Output: {}", config.archive_path.display());
    match fs::metadata(&config.archive_path) {
        Ok(meta) => {
            println!("  Size: {:.1} MB", meta.len() as f64 / 1024.0 / 1024.0);
        }
        Err(e) => {
            eprintln!("  [WARN] Could not read archive size: {}", e);
        }
    }
    println!("  Files: {}", files);
    println!("  Directories: {}", dirs);
    println!("  Symlinks: {}", symlinks);
}
