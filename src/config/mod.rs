//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each
//! subsystem, `AppPaths`/`WorkPaths` for the settings file and the fixed
//! pipeline artifacts, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, WorkPaths};
pub use settings::{
    AppConfig, CameraConfig, GpioConfig, SoundsConfig, SpeechConfig, TimingConfig,
};
