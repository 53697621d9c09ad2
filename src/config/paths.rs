//! Resolved filesystem paths.
//!
//! [`AppPaths`] locates `settings.toml` under the platform config dir via
//! the `dirs` crate.  [`WorkPaths`] resolves the two fixed pipeline
//! artifacts: every stage reads and writes the same well-known paths, so a
//! run always overwrites the previous run's artifacts — by design, since
//! only one run ever exists at a time.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AppPaths
// ---------------------------------------------------------------------------

/// Resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "pi-text-reader";

    /// Resolve paths via the `dirs` crate, falling back to the current
    /// directory if the platform cannot provide a standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");

        Self {
            config_dir,
            settings_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// WorkPaths
// ---------------------------------------------------------------------------

/// The fixed pipeline artifact paths under the work directory.
#[derive(Debug, Clone)]
pub struct WorkPaths {
    /// Where the camera writes and OCR reads.
    pub image_file: PathBuf,
    /// Where OCR writes, cleanup rewrites and speech reads.
    pub text_file: PathBuf,
}

impl WorkPaths {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            image_file: work_dir.join("image.jpg"),
            text_file: work_dir.join("text.txt"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
