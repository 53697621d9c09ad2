//! OCR adapter.
//!
//! `tesseract <image> <stem>` writes its output to `<stem>.txt`, so the
//! adapter is constructed from the text artifact path and derives the stem
//! from it.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run_command, ToolError};

// ---------------------------------------------------------------------------
// OcrEngine trait
// ---------------------------------------------------------------------------

/// Blocking optical character recognition.
///
/// # Contract
///
/// - Blocks until recognition completes.
/// - On success the text artifact exists at the returned path; on failure
///   the previous run's artifact (if any) is left in place.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<PathBuf, ToolError>;
}

// ---------------------------------------------------------------------------
// Tesseract
// ---------------------------------------------------------------------------

/// Shells out to the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct Tesseract {
    program: String,
    text_file: PathBuf,
}

impl Tesseract {
    /// `text_file` is the fixed text artifact path, extension included
    /// (e.g. `/tmp/text.txt`).
    pub fn new(text_file: PathBuf) -> Self {
        Self {
            program: "tesseract".into(),
            text_file,
        }
    }

    /// Override the binary name/path (tests, non-standard installs).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Output stem handed to tesseract: the text path minus its extension.
    fn output_stem(&self) -> PathBuf {
        self.text_file.with_extension("")
    }
}

impl OcrEngine for Tesseract {
    fn recognize(&self, image: &Path) -> Result<PathBuf, ToolError> {
        let stem = self.output_stem();
        let display = format!(
            "{} {} {}",
            self.program,
            image.display(),
            stem.display()
        );

        let mut cmd = Command::new(&self.program);
        cmd.arg(image).arg(&stem);
        run_command(cmd, &display)?;

        Ok(self.text_file.clone())
    }
}

// ---------------------------------------------------------------------------
// MockOcr  (test-only)
// ---------------------------------------------------------------------------

/// Test double that "recognises" the captured image by copying its bytes
/// into the text artifact, making stale-image leakage observable.
#[cfg(test)]
pub struct MockOcr {
    pub text_file: PathBuf,
}

#[cfg(test)]
impl OcrEngine for MockOcr {
    fn recognize(&self, image: &Path) -> Result<PathBuf, ToolError> {
        let contents = std::fs::read_to_string(image)?;
        std::fs::write(&self.text_file, contents)?;
        Ok(self.text_file.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
