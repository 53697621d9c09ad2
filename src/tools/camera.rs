//! Image capture adapter.
//!
//! The capture command is a user-configurable template (`raspistill` by
//! default) with an `{output}` placeholder for the image artifact path.  The
//! template is a full shell command line, so it runs under `sh -c` exactly
//! as configured.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run_command, ToolError};

// ---------------------------------------------------------------------------
// Camera trait
// ---------------------------------------------------------------------------

/// Blocking image capture.
///
/// # Contract
///
/// - Blocks until the capture completes.
/// - On success the image artifact exists at the returned path.
/// - On failure no artifact may have been written; callers that ignore the
///   error will hand the previous run's stale image (or nothing) to OCR.
pub trait Camera: Send + Sync {
    fn capture(&self) -> Result<PathBuf, ToolError>;
}

// ---------------------------------------------------------------------------
// CommandCamera
// ---------------------------------------------------------------------------

/// Runs the configured capture command template.
#[derive(Debug, Clone)]
pub struct CommandCamera {
    command: String,
    image_file: PathBuf,
}

impl CommandCamera {
    /// Substitute `{output}` in `template` with `image_file`.
    pub fn new(template: &str, image_file: PathBuf) -> Self {
        let command = template.replace("{output}", &image_file.display().to_string());
        Self {
            command,
            image_file,
        }
    }

    /// The fixed artifact path this camera writes to.
    pub fn image_file(&self) -> &Path {
        &self.image_file
    }
}

impl Camera for CommandCamera {
    fn capture(&self) -> Result<PathBuf, ToolError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command);
        run_command(cmd, &self.command)?;
        Ok(self.image_file.clone())
    }
}

// ---------------------------------------------------------------------------
// MockCamera  (test-only)
// ---------------------------------------------------------------------------

/// Test double that writes configured bytes to the artifact path, or fails.
#[cfg(test)]
pub struct MockCamera {
    pub image_file: PathBuf,
    pub bytes: Option<Vec<u8>>,
}

#[cfg(test)]
impl Camera for MockCamera {
    fn capture(&self) -> Result<PathBuf, ToolError> {
        match &self.bytes {
            Some(bytes) => {
                std::fs::write(&self.image_file, bytes)?;
                Ok(self.image_file.clone())
            }
            None => Err(ToolError::NonZeroExit {
                cmd: "mock-camera".into(),
                code: 1,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
