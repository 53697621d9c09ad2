//! External tool adapters — camera, OCR, speech synthesis, audio output.
//!
//! # Architecture
//!
//! Each adapter is one trait seam over one external command:
//!
//! | Trait          | Production impl  | Command                      |
//! |----------------|------------------|------------------------------|
//! | [`Camera`]     | [`CommandCamera`]| configurable, e.g. raspistill|
//! | [`OcrEngine`]  | [`Tesseract`]    | `tesseract <img> <stem>`     |
//! | [`SpeechEngine`]| [`Flite`]       | `flite -t …` / `flite -f …`  |
//! | [`AudioOut`]   | [`Alsa`]         | `aplay -q …` / `amixer …`    |
//!
//! All traits are object-safe and `Send + Sync` so the pipeline can hold
//! them behind `Arc<dyn …>` and run them on the blocking thread pool.
//!
//! # Failure policy
//!
//! Every operation returns `Result<_, ToolError>` so failures stay visible
//! to callers and tests, but the pipeline's policy is best-effort: a failed
//! stage is logged and the cycle advances.  On a device whose only feedback
//! channel is audible output, silence already tells the user something went
//! wrong.

pub mod audio;
pub mod camera;
pub mod ocr;
pub mod speech;

pub use audio::{Alsa, AudioOut};
pub use camera::{Camera, CommandCamera};
pub use ocr::{OcrEngine, Tesseract};
pub use speech::{Flite, SpeechEngine, SpeechProcess};

use std::process::Command;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ToolError
// ---------------------------------------------------------------------------

/// All errors that can surface from an external tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The command could not be started at all (missing binary, bad path).
    #[error("cannot spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited with a non-zero status.
    #[error("`{cmd}` exited with status {code}")]
    NonZeroExit { cmd: String, code: i32 },

    /// Filesystem or process I/O error around the invocation.
    #[error("tool i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// run_command
// ---------------------------------------------------------------------------

/// Run `cmd` to completion, logging the command line first the way the
/// device's debug log always has.
///
/// `display` is the human-readable command line used in logs and errors.
pub(crate) fn run_command(mut cmd: Command, display: &str) -> Result<(), ToolError> {
    log::info!("{display}");

    let status = cmd.status().map_err(|source| ToolError::Spawn {
        cmd: display.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ToolError::NonZeroExit {
            cmd: display.to_string(),
            // A None code means the process died to a signal.
            code: status.code().unwrap_or(-1),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
