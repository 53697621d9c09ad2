//! Pipeline module — the read-cycle state machine and its controller.
//!
//! # Architecture
//!
//! ```text
//! main loop (polls button every poll_ms while Idle)
//!        │ press
//!        ▼
//! PipelineController::run_cycle()      ← async, one at a time
//!        │
//!        ├─ Capturing   → LED off, shutter sound, camera
//!        ├─ Recognizing → wait announcement, OCR
//!        ├─ Cleaning    → text normalisation
//!        ├─ Speaking    → CancelWatcher armed, speech in flight
//!        └─ Resetting   → watcher stopped, LED on, ready announcement
//!
//! SharedState (Arc<Mutex<ReaderState>>) ← phase snapshots for logs/tests
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineController, Toolbox, READY_PHRASE, WAIT_PHRASE};
pub use state::{new_shared_state, ReadPhase, ReaderState, SharedState};
