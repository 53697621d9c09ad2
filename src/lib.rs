//! Pi Text Reader — a button-triggered printed-text reader for sight
//! impaired users.
//!
//! One press of the physical button captures an image of a printed page,
//! runs OCR over it, normalises the text for prosody and reads it aloud.
//! A second press during playback kills the speech immediately.  An LED on
//! the button shows when the device is ready for a press.
//!
//! # Module map
//!
//! - [`config`] — settings (TOML) and the fixed artifact paths.
//! - [`gpio`] — button and LED traits plus the sysfs implementation.
//! - [`tools`] — adapters for the external camera/OCR/speech/audio commands.
//! - [`text`] — OCR text cleanup.
//! - [`watch`] — the active speech handle, the shared slot and the cancel
//!   watcher.
//! - [`pipeline`] — the read-cycle state machine and controller.

pub mod config;
pub mod gpio;
pub mod pipeline;
pub mod text;
pub mod tools;
pub mod watch;

pub use config::AppConfig;
pub use gpio::{ButtonInput, Indicator, InputState};
pub use pipeline::{PipelineController, ReadPhase, Toolbox};
pub use watch::{ActiveSpeech, CancelWatcher, SpeechSlot};
