//! Speech synthesis adapter.
//!
//! Two modes of use:
//!
//! - [`SpeechEngine::speak_phrase`] — short blocking status announcements
//!   ("OK, ready", "now working. please wait.").
//! - [`SpeechEngine::start_reading`] — launches a long-running synthesis of
//!   the text artifact and returns a [`SpeechProcess`] handle.  The handle
//!   is what makes interruption possible: the pipeline waits on it while
//!   the cancel watcher can kill it at any moment.
//!
//! Spoken phrases are passed as a single argv element — never through a
//! shell — so arbitrary OCR'd text cannot smuggle shell syntax into the
//! command line.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use super::{run_command, ToolError};
use crate::config::SpeechConfig;

// ---------------------------------------------------------------------------
// SpeechProcess
// ---------------------------------------------------------------------------

/// Handle to one in-flight speech synthesis process.
///
/// # Contract
///
/// - `try_wait` is non-blocking; `Ok(true)` once the process has exited.
/// - `kill` is idempotent: killing an already-finished process (or killing
///   twice) is a no-op and must not error.
pub trait SpeechProcess: Send {
    fn try_wait(&mut self) -> Result<bool, ToolError>;
    fn kill(&mut self) -> Result<(), ToolError>;
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Text-to-speech front end.
pub trait SpeechEngine: Send + Sync {
    /// Speak a short status phrase, blocking until playback completes.
    fn speak_phrase(&self, text: &str) -> Result<(), ToolError>;

    /// Start reading the text artifact at `text` asynchronously.
    fn start_reading(&self, text: &Path) -> Result<Box<dyn SpeechProcess>, ToolError>;
}

// Compile-time assertion: the engine must remain object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: &dyn SpeechEngine) {}
};

// ---------------------------------------------------------------------------
// Flite
// ---------------------------------------------------------------------------

/// Production engine shelling out to the `flite` synthesiser.
#[derive(Debug, Clone)]
pub struct Flite {
    program: String,
    voice: String,
    speed: f32,
}

impl Flite {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            program: "flite".into(),
            voice: config.voice.clone(),
            speed: config.speed,
        }
    }

    /// Override the binary name/path (tests, non-standard installs).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn duration_stretch(&self) -> String {
        format!("duration_stretch={}", self.speed)
    }
}

impl SpeechEngine for Flite {
    fn speak_phrase(&self, text: &str) -> Result<(), ToolError> {
        let display = format!(
            "{} -voice {} --setf {} -t \"{text}\"",
            self.program,
            self.voice,
            self.duration_stretch()
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(["-voice", &self.voice, "--setf", &self.duration_stretch()])
            .arg("-t")
            .arg(text);
        run_command(cmd, &display)
    }

    fn start_reading(&self, text: &Path) -> Result<Box<dyn SpeechProcess>, ToolError> {
        let display = format!(
            "{} -voice {} -f {}",
            self.program,
            self.voice,
            text.display()
        );
        log::info!("{display}");

        let child = Command::new(&self.program)
            .args(["-voice", &self.voice, "-f"])
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                cmd: display,
                source,
            })?;

        Ok(Box::new(ChildProcess {
            child,
            finished: false,
        }))
    }
}

// ---------------------------------------------------------------------------
// ChildProcess
// ---------------------------------------------------------------------------

/// [`SpeechProcess`] over a spawned [`Child`].
///
/// `finished` latches once the child has been reaped so `kill` after natural
/// completion never touches a recycled pid.
pub struct ChildProcess {
    child: Child,
    finished: bool,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            finished: false,
        }
    }
}

impl SpeechProcess for ChildProcess {
    fn try_wait(&mut self) -> Result<bool, ToolError> {
        if self.finished {
            return Ok(true);
        }
        match self.child.try_wait()? {
            Some(_status) => {
                self.finished = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn kill(&mut self) -> Result<(), ToolError> {
        // Already reaped — nothing to do.
        if self.try_wait()? {
            return Ok(());
        }
        self.child.kill()?;
        // Reap so the child does not linger as a zombie.
        let _ = self.child.wait();
        self.finished = true;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
