//! Interruptible speech — the shared slot and the cancel watcher.
//!
//! # Architecture
//!
//! ```text
//! PipelineController                          CancelWatcher thread
//! ──────────────────                          ────────────────────
//! start_reading() → Box<dyn SpeechProcess>
//! Arc<ActiveSpeech> ──publish──▶ SpeechSlot ◀──upgrade (Weak)──┐
//! wait()  (polls try_wait)                    every poll_ms:   │
//!   ▲                                         button pressed? ─┘
//!   └─ returns on natural exit                → kill_current()
//!      or after the watcher kills             → sleep settle_ms
//! slot.clear(); watcher.stop()
//! ```
//!
//! Ownership is deliberately asymmetric: the controller holds the only
//! strong reference to the [`ActiveSpeech`] for exactly the duration of the
//! speech stage; the watcher reaches it through a `Weak` in the
//! [`SpeechSlot`] and can only ask it to die.  Once the controller clears
//! the slot and drops its `Arc`, a late watcher tick upgrades to nothing
//! and does nothing.
//!
//! There is no channel and no precise synchronisation here — coarse polling
//! plus an idempotent `kill` is enough, because the only race (speech
//! finishing naturally while a kill is issued) converges to the same state
//! either way.

pub mod cancel;
pub mod slot;

pub use cancel::CancelWatcher;
pub use slot::{ActiveSpeech, SpeechSlot};
