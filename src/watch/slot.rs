//! [`ActiveSpeech`] — one in-flight speech process, and [`SpeechSlot`] — the
//! shared lookup point the cancel watcher kills it through.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use crate::tools::SpeechProcess;

/// How often `wait` polls the process for completion.  The lock is released
/// between polls so a concurrent `kill` is never starved.
const WAIT_POLL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// ActiveSpeech
// ---------------------------------------------------------------------------

/// One in-flight speech synthesis process.
///
/// Created immediately before the speech stage begins and dropped
/// immediately after it ends; at most one exists at any time.
pub struct ActiveSpeech {
    proc: Mutex<Box<dyn SpeechProcess>>,
}

impl ActiveSpeech {
    pub fn new(proc: Box<dyn SpeechProcess>) -> Self {
        Self {
            proc: Mutex::new(proc),
        }
    }

    /// Block until the process exits — naturally or by [`kill`](Self::kill).
    ///
    /// Polls `try_wait` under a brief lock; a poll error is treated as
    /// completion (nothing left worth waiting on).
    pub fn wait(&self) {
        loop {
            let done = {
                let mut proc = self.proc.lock().unwrap();
                proc.try_wait().unwrap_or_else(|e| {
                    log::warn!("speech: wait poll failed ({e}), treating as finished");
                    true
                })
            };
            if done {
                return;
            }
            std::thread::sleep(WAIT_POLL);
        }
    }

    /// Forcibly terminate the process.  A no-op when the process has
    /// already finished; calling twice is harmless.
    pub fn kill(&self) {
        let mut proc = self.proc.lock().unwrap();
        match proc.try_wait() {
            Ok(true) => {} // already finished — nothing to kill
            Ok(false) => {
                if let Err(e) = proc.kill() {
                    log::warn!("speech: kill failed: {e}");
                }
            }
            Err(e) => log::warn!("speech: kill poll failed: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSlot
// ---------------------------------------------------------------------------

/// Shared lookup point for the current [`ActiveSpeech`].
///
/// The pipeline controller is the sole writer (`publish` / `clear`); the
/// cancel watcher only ever upgrades the `Weak` to issue a kill.  An empty
/// slot makes `kill_current` a no-op.
pub struct SpeechSlot {
    current: Mutex<Weak<ActiveSpeech>>,
}

impl SpeechSlot {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Weak::new()),
        }
    }

    /// Make `speech` visible to the watcher.
    pub fn publish(&self, speech: &Arc<ActiveSpeech>) {
        *self.current.lock().unwrap() = Arc::downgrade(speech);
    }

    /// Empty the slot.  Safe to call when already empty.
    pub fn clear(&self) {
        *self.current.lock().unwrap() = Weak::new();
    }

    /// Kill the published speech process, if any.  Returns `true` when a
    /// live process was found and a kill was issued.
    pub fn kill_current(&self) -> bool {
        let speech = self.current.lock().unwrap().upgrade();
        match speech {
            Some(speech) => {
                speech.kill();
                true
            }
            None => false,
        }
    }
}

impl Default for SpeechSlot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
