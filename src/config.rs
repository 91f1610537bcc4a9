//! Release layout configuration.
//!
//! All paths are resolved once here. The defaults reproduce the layout the
//! pipeline has always used: everything lives under the project root, with
//! CMake output in `build/`, staged files in `build/package/`, the mirrored
//! tree in `release/` and the archive at `release.zip`.

use std::path::{Path, PathBuf};

pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_PACKAGE_SUBDIR: &str = "package";
pub const DEFAULT_RELEASE_DIR: &str = "release";
pub const DEFAULT_ARCHIVE_BASE: &str = "release";
pub const DEFAULT_PROFILE: &str = "Release";
pub const DEFAULT_TARGETS: &[&str] = &["game", "server", "editor"];

/// Resolved paths and build settings for one release run.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Directory holding the top-level CMakeLists.txt.
    pub project_root: PathBuf,
    /// CMake binary directory, recreated from scratch on every build.
    pub build_dir: PathBuf,
    /// Staging tree the build populates, source of the mirror step.
    pub package_dir: PathBuf,
    /// Destination of the mirror step.
    pub release_dir: PathBuf,
    /// Final zip archive path.
    pub archive_path: PathBuf,
    /// CMake build configuration.
    pub profile: String,
    /// CMake targets, built in order.
    pub targets: Vec<String>,
}

impl ReleaseConfig {
    /// Default layout rooted at `project_root`.
    pub fn new(project_root: &Path) -> Self {
        let targets = DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect();
        Self::with_targets(project_root, targets)
    }

    /// Default layout rooted at `project_root` with an explicit target list.
    pub fn with_targets(project_root: &Path, targets: Vec<String>) -> Self {
        let build_dir = project_root.join(DEFAULT_BUILD_DIR);
        let package_dir = build_dir.join(DEFAULT_PACKAGE_SUBDIR);
        Self {
            project_root: project_root.to_path_buf(),
            build_dir,
            package_dir,
            release_dir: project_root.join(DEFAULT_RELEASE_DIR),
            archive_path: project_root.join(format!("{}.zip", DEFAULT_ARCHIVE_BASE)),
            profile: DEFAULT_PROFILE.to_string(),
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = ReleaseConfig::new(Path::new("/proj"));
        assert_eq!(config.build_dir, Path::new("/proj/build"));
        assert_eq!(config.package_dir, Path::new("/proj/build/package"));
        assert_eq!(config.release_dir, Path::new("/proj/release"));
        assert_eq!(config.archive_path, Path::new("/proj/release.zip"));
        assert_eq!(config.profile, "Release");
        assert_eq!(config.targets, ["game", "server", "editor"]);
    }

    #[test]
    fn test_custom_targets() {
        let config =
            ReleaseConfig::with_targets(Path::new("/proj"), vec!["server".to_string()]);
        assert_eq!(config.targets, ["server"]);
        assert_eq!(config.build_dir, Path::new("/proj/build"));
    }
}
