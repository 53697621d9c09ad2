//! Pipeline controller — drives one capture → OCR → cleanup → speech cycle.
//!
//! # Cycle flow
//!
//! ```text
//! run_cycle()
//!   ├─ Capturing:   LED off, shutter sound, camera command
//!   ├─ Recognizing: "now working. please wait.", tesseract
//!   ├─ Cleaning:    normalise the text artifact
//!   ├─ Speaking:    arm CancelWatcher → start speech → wait
//!   │                 (the watcher may kill the speech at any poll tick)
//!   └─ Resetting:   stop watcher, LED on, pause, "OK, ready"
//! ```
//!
//! Every external stage is blocking and runs under
//! `tokio::task::spawn_blocking` so the runtime never stalls.  No stage is
//! retried and no failure stops the cycle: a failed tool is logged, noted in
//! [`ReaderState::last_error`] and the cycle advances.  The watcher is armed
//! strictly before the speech process is started and stopped strictly after
//! the speech stage concludes, so no press is dropped once speaking begins.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{TimingConfig, WorkPaths};
use crate::gpio::{ButtonInput, Indicator};
use crate::text::clean_file;
use crate::tools::{AudioOut, Camera, OcrEngine, SpeechEngine};
use crate::watch::{ActiveSpeech, CancelWatcher, SpeechSlot};

use super::state::{ReadPhase, SharedState};

/// Spoken while OCR grinds through the captured image.
pub const WAIT_PHRASE: &str = "now working. please wait.";
/// Spoken whenever the device becomes ready for a press.
pub const READY_PHRASE: &str = "OK, ready";

// ---------------------------------------------------------------------------
// Toolbox
// ---------------------------------------------------------------------------

/// The external tool adapters the controller drives.
#[derive(Clone)]
pub struct Toolbox {
    pub camera: Arc<dyn Camera>,
    pub ocr: Arc<dyn OcrEngine>,
    pub speech: Arc<dyn SpeechEngine>,
    pub audio: Arc<dyn AudioOut>,
}

// ---------------------------------------------------------------------------
// PipelineController
// ---------------------------------------------------------------------------

/// Runs read cycles.  There is exactly one instance and exactly one cycle
/// in flight at a time; the main loop is the only caller.
pub struct PipelineController {
    state: SharedState,
    button: Arc<dyn ButtonInput>,
    indicator: Arc<dyn Indicator>,
    tools: Toolbox,
    slot: Arc<SpeechSlot>,
    paths: WorkPaths,
    shutter_sound: PathBuf,
    timing: TimingConfig,
}

impl PipelineController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: SharedState,
        button: Arc<dyn ButtonInput>,
        indicator: Arc<dyn Indicator>,
        tools: Toolbox,
        slot: Arc<SpeechSlot>,
        paths: WorkPaths,
        shutter_sound: PathBuf,
        timing: TimingConfig,
    ) -> Self {
        Self {
            state,
            button,
            indicator,
            tools,
            slot,
            paths,
            shutter_sound,
            timing,
        }
    }

    /// Run one full read cycle: all six phases, ending back at `Idle` with
    /// the indicator on and the watcher stopped, regardless of tool
    /// failures or interruption.
    pub async fn run_cycle(&self) {
        log::info!("pipeline: read cycle started");

        // ── 1. Capturing ─────────────────────────────────────────────────
        self.set_phase(ReadPhase::Capturing);
        self.indicator.set(false);

        {
            let audio = Arc::clone(&self.tools.audio);
            let shutter = self.shutter_sound.clone();
            match tokio::task::spawn_blocking(move || audio.play_effect(&shutter)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.note_failure("shutter sound", &e),
                Err(e) => self.note_failure("shutter sound", &e),
            }
        }

        let image = {
            let camera = Arc::clone(&self.tools.camera);
            match tokio::task::spawn_blocking(move || camera.capture()).await {
                Ok(Ok(path)) => path,
                Ok(Err(e)) => {
                    // Whatever sits at the fixed artifact path — possibly
                    // the previous run's image — goes to OCR.
                    self.note_failure("capture", &e);
                    self.paths.image_file.clone()
                }
                Err(e) => {
                    self.note_failure("capture", &e);
                    self.paths.image_file.clone()
                }
            }
        };

        // ── 2. Recognizing ───────────────────────────────────────────────
        self.set_phase(ReadPhase::Recognizing);

        {
            let speech = Arc::clone(&self.tools.speech);
            match tokio::task::spawn_blocking(move || speech.speak_phrase(WAIT_PHRASE)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.note_failure("wait announcement", &e),
                Err(e) => self.note_failure("wait announcement", &e),
            }
        }

        let text = {
            let ocr = Arc::clone(&self.tools.ocr);
            let image = image.clone();
            match tokio::task::spawn_blocking(move || ocr.recognize(&image)).await {
                Ok(Ok(path)) => path,
                Ok(Err(e)) => {
                    self.note_failure("ocr", &e);
                    self.paths.text_file.clone()
                }
                Err(e) => {
                    self.note_failure("ocr", &e);
                    self.paths.text_file.clone()
                }
            }
        };

        // ── 3. Cleaning ──────────────────────────────────────────────────
        self.set_phase(ReadPhase::Cleaning);

        {
            let text = text.clone();
            match tokio::task::spawn_blocking(move || clean_file(&text)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.note_failure("cleanup", &e),
                Err(e) => self.note_failure("cleanup", &e),
            }
        }

        // ── 4. Speaking ──────────────────────────────────────────────────
        self.set_phase(ReadPhase::Speaking);

        // Armed strictly before the speech process exists: a press is never
        // silently dropped once speaking begins.
        let mut watcher = CancelWatcher::new(
            Arc::clone(&self.button),
            Arc::clone(&self.slot),
            self.timing.poll(),
            self.timing.settle(),
        );
        watcher.start();

        {
            let speech = Arc::clone(&self.tools.speech);
            let text = text.clone();
            match tokio::task::spawn_blocking(move || speech.start_reading(&text)).await {
                Ok(Ok(proc)) => {
                    let active = Arc::new(ActiveSpeech::new(proc));
                    self.slot.publish(&active);

                    let waiter = Arc::clone(&active);
                    if let Err(e) = tokio::task::spawn_blocking(move || waiter.wait()).await {
                        self.note_failure("speech wait", &e);
                    }
                }
                Ok(Err(e)) => self.note_failure("speech start", &e),
                Err(e) => self.note_failure("speech start", &e),
            }
        }
        self.slot.clear();

        // ── 5. Resetting ─────────────────────────────────────────────────
        self.set_phase(ReadPhase::Resetting);

        // Stopped strictly after either completion path; the finished
        // watcher is discarded with this cycle.
        watcher.stop();

        self.indicator.set(true);
        tokio::time::sleep(self.timing.ready_pause()).await;

        {
            let speech = Arc::clone(&self.tools.speech);
            match tokio::task::spawn_blocking(move || speech.speak_phrase(READY_PHRASE)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.note_failure("ready announcement", &e),
                Err(e) => self.note_failure("ready announcement", &e),
            }
        }

        // ── 6. Back to Idle ──────────────────────────────────────────────
        self.set_phase(ReadPhase::Idle);
        log::info!("pipeline: read cycle finished");
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> ReadPhase {
        self.state.lock().unwrap().phase
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_phase(&self, phase: ReadPhase) {
        log::debug!("pipeline: → {}", phase.label());
        let mut st = self.state.lock().unwrap();
        st.phase = phase;
    }

    fn note_failure(&self, stage: &str, err: &dyn std::fmt::Display) {
        log::warn!("pipeline: {stage} failed ({err}) — continuing");
        let mut st = self.state.lock().unwrap();
        st.last_error = Some(format!("{stage}: {err}"));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
