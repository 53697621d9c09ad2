//! Audio output adapter — sound effects and mixer volume.

use std::path::Path;
use std::process::Command;

use super::{run_command, ToolError};

// ---------------------------------------------------------------------------
// AudioOut trait
// ---------------------------------------------------------------------------

/// Sound-effect playback and output volume.
pub trait AudioOut: Send + Sync {
    /// Play a WAV file, blocking until playback completes.  Best-effort.
    fn play_effect(&self, path: &Path) -> Result<(), ToolError>;

    /// Set the output mixer volume as a percentage (0–100).
    fn set_volume(&self, percent: u8) -> Result<(), ToolError>;
}

// ---------------------------------------------------------------------------
// Alsa
// ---------------------------------------------------------------------------

/// Shells out to `aplay` / `amixer`.
#[derive(Debug, Clone)]
pub struct Alsa {
    /// Mixer control name, `PCM,0` on the Pi's onboard audio.
    control: String,
}

impl Default for Alsa {
    fn default() -> Self {
        Self {
            control: "PCM,0".into(),
        }
    }
}

impl Alsa {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOut for Alsa {
    fn play_effect(&self, path: &Path) -> Result<(), ToolError> {
        let display = format!("aplay -q {}", path.display());
        let mut cmd = Command::new("aplay");
        cmd.arg("-q").arg(path);
        run_command(cmd, &display)
    }

    fn set_volume(&self, percent: u8) -> Result<(), ToolError> {
        let level = format!("{}%", percent.min(100));
        let display = format!("amixer -q sset {} {level}", self.control);
        let mut cmd = Command::new("amixer");
        cmd.args(["-q", "sset", &self.control, &level]);
        run_command(cmd, &display)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
