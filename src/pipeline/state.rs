//! Read-cycle state machine and shared reader state.
//!
//! [`ReadPhase`] tracks which stage of a read cycle the controller is in.
//! The phases exist to reason about side effects: the LED must be OFF from
//! `Capturing` through `Speaking` and ON again from `Resetting` onwards.
//!
//! [`SharedState`] (`Arc<Mutex<ReaderState>>`) is mutated only by the
//! pipeline controller and the main loop at phase boundaries — there are no
//! concurrent writers.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// ReadPhase
// ---------------------------------------------------------------------------

/// Phases of one button-triggered read cycle.
///
/// The transitions are strictly sequential:
///
/// ```text
/// Idle ──button press──▶ Capturing ──▶ Recognizing ──▶ Cleaning
///                                                        │
///        Idle ◀── Resetting ◀── Speaking ◀───────────────┘
///                     ▲             │
///                     └── natural completion or watcher kill
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPhase {
    /// Waiting for a button press; LED on.
    Idle,

    /// Shutter sound played, camera command running; LED off.
    Capturing,

    /// OCR running on the captured image.
    Recognizing,

    /// Text artifact being normalised for prosody.
    Cleaning,

    /// Speech synthesis in flight; the cancel watcher is armed.
    Speaking,

    /// Watcher stopped, LED back on, ready announcement playing.
    Resetting,
}

impl ReadPhase {
    /// Returns `true` for the stretch of the cycle during which the LED
    /// must be off and a button press means "stop", not "start".
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ReadPhase::Capturing | ReadPhase::Recognizing | ReadPhase::Cleaning | ReadPhase::Speaking
        )
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ReadPhase::Idle => "idle",
            ReadPhase::Capturing => "capturing",
            ReadPhase::Recognizing => "recognizing",
            ReadPhase::Cleaning => "cleaning",
            ReadPhase::Speaking => "speaking",
            ReadPhase::Resetting => "resetting",
        }
    }
}

impl Default for ReadPhase {
    fn default() -> Self {
        ReadPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// ReaderState / SharedState
// ---------------------------------------------------------------------------

/// Shared reader state, written at phase boundaries.
#[derive(Debug, Default)]
pub struct ReaderState {
    /// Current phase of the read cycle.
    pub phase: ReadPhase,

    /// Most recent swallowed tool failure, kept for diagnostics.  The
    /// pipeline never acts on it.
    pub last_error: Option<String>,
}

/// Thread-safe handle to [`ReaderState`].  Lock for short critical
/// sections only; never hold the lock across a blocking stage.
pub type SharedState = Arc<Mutex<ReaderState>>;

/// Construct a new [`SharedState`] starting at [`ReadPhase::Idle`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(ReaderState::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
