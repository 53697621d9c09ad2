//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across
//! threads.  Every option is a static startup parameter; nothing here is
//! runtime-mutable.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the speech synthesiser and output volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech speed passed as flite's `duration_stretch` (0.5 – 2.0).
    pub speed: f32,
    /// Playback volume percentage (0 – 100).
    pub volume: u8,
    /// flite voice name.
    pub voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            volume: 90,
            voice: "awb".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CameraConfig
// ---------------------------------------------------------------------------

/// Image capture command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Full shell command template; `{output}` is replaced with the image
    /// artifact path.
    pub command: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: "raspistill -cfx 128:128 --awb auto -rot 180 -t 500 -o {output}".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SoundsConfig
// ---------------------------------------------------------------------------

/// Sound-effect files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    /// Directory holding the WAV effects.
    pub dir: PathBuf,
    /// Shutter effect file name inside `dir`.
    pub shutter: String,
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/home/pi/pi-text-reader/sounds"),
            shutter: "camera-shutter.wav".into(),
        }
    }
}

impl SoundsConfig {
    /// Full path to the shutter effect.
    pub fn shutter_path(&self) -> PathBuf {
        self.dir.join(&self.shutter)
    }
}

// ---------------------------------------------------------------------------
// GpioConfig
// ---------------------------------------------------------------------------

/// BCM pin assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpioConfig {
    /// The button (pull-up, active-low).
    pub button_pin: u8,
    /// The button's LED (active-high).
    pub led_pin: u8,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            button_pin: 24,
            led_pin: 18,
        }
    }
}

// ---------------------------------------------------------------------------
// TimingConfig
// ---------------------------------------------------------------------------

/// Polling and settle intervals.
///
/// These are latency bounds, not implementation accidents: a press during
/// speech must be acted on within `poll_ms` (+ `settle_ms` for the kill to
/// settle), matching the responsiveness of a press during idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Button poll interval for both the main loop and the cancel watcher.
    pub poll_ms: u64,
    /// Pause after killing a speech process.
    pub settle_ms: u64,
    /// Pause between LED-on and the ready announcement.
    pub ready_pause_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_ms: 200,
            settle_ms: 500,
            ready_pause_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn ready_pause(&self) -> Duration {
        Duration::from_millis(self.ready_pause_ms)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use pi_text_reader::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Verbose logging.
    pub debug: bool,
    /// Directory for the fixed image/text artifacts.
    pub work_dir: PathBuf,
    /// Speech synthesis / volume settings.
    pub speech: SpeechConfig,
    /// Image capture settings.
    pub camera: CameraConfig,
    /// Sound effects.
    pub sounds: SoundsConfig,
    /// Pin assignments.
    pub gpio: GpioConfig,
    /// Poll/settle intervals.
    pub timing: TimingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            work_dir: PathBuf::from("/tmp"),
            speech: SpeechConfig::default(),
            camera: CameraConfig::default(),
            sounds: SoundsConfig::default(),
            gpio: GpioConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.validate();
        Ok(config)
    }

    /// Save to the platform-appropriate `settings.toml`, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp out-of-range values instead of rejecting the file.
    pub fn validate(&mut self) {
        self.speech.speed = self.speech.speed.clamp(0.5, 2.0);
        self.speech.volume = self.speech.volume.min(100);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
