//! Cancellation watcher — a dedicated polling thread that kills the current
//! speech process the moment the button is pressed again.
//!
//! A press during speech must feel exactly as responsive as a press during
//! idle, so the watcher runs its own low-latency poll loop instead of the
//! pipeline checking the button between stages.  While armed it samples the
//! button every `poll_ms`; on a press it kills through the [`SpeechSlot`]
//! and sleeps `settle_ms` to let termination settle.  It never disarms
//! itself — only an explicit [`stop`](CancelWatcher::stop) from the
//! pipeline ends it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::gpio::{ButtonInput, InputState};

use super::SpeechSlot;

// ---------------------------------------------------------------------------
// CancelWatcher
// ---------------------------------------------------------------------------

/// Handle to the watcher thread for one speech stage.
///
/// Constructed disarmed and bound to its button, slot and timing; a fresh
/// instance is created for every cycle.  [`start`](Self::start) arms it and
/// spawns the thread, [`stop`](Self::stop) disarms it and joins.  Dropping
/// a started watcher stops it.
pub struct CancelWatcher {
    armed: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    button: Arc<dyn ButtonInput>,
    slot: Arc<SpeechSlot>,
    poll: Duration,
    settle: Duration,
}

impl CancelWatcher {
    /// Create a disarmed watcher bound to the kill action.
    pub fn new(
        button: Arc<dyn ButtonInput>,
        slot: Arc<SpeechSlot>,
        poll: Duration,
        settle: Duration,
    ) -> Self {
        Self {
            armed: Arc::new(AtomicBool::new(false)),
            thread: None,
            button,
            slot,
            poll,
            settle,
        }
    }

    /// Arm the watcher and spawn its polling thread.  Calling `start` on an
    /// already-running watcher is a no-op.
    pub fn start(&mut self) {
        if self.thread.is_some() {
            return;
        }
        self.armed.store(true, Ordering::SeqCst);

        let armed = Arc::clone(&self.armed);
        let button = Arc::clone(&self.button);
        let slot = Arc::clone(&self.slot);
        let poll = self.poll;
        let settle = self.settle;

        let thread = std::thread::Builder::new()
            .name("cancel-watcher".into())
            .spawn(move || {
                while armed.load(Ordering::SeqCst) {
                    if button.read() == InputState::Pressed && slot.kill_current() {
                        log::info!("cancel-watcher: button press, speech killed");
                        // Let termination settle before polling again; an
                        // empty slot next tick makes further presses no-ops.
                        std::thread::sleep(settle);
                    }
                    std::thread::sleep(poll);
                }
            })
            .expect("failed to spawn cancel-watcher thread");

        self.thread = Some(thread);
    }

    /// Disarm the watcher and join its thread.  Safe to call on a watcher
    /// that never started, or whose slot is already empty.
    pub fn stop(&mut self) {
        self.armed.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("cancel-watcher: thread panicked");
            }
        }
    }

    /// Whether the polling loop is currently armed.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl Drop for CancelWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use crate::gpio::MockButton;
    use crate::tools::{SpeechProcess, ToolError};
    use crate::watch::ActiveSpeech;

    struct NeverEndingProcess {
        kills: Arc<AtomicUsize>,
        killed: bool,
    }

    impl SpeechProcess for NeverEndingProcess {
        fn try_wait(&mut self) -> Result<bool, ToolError> {
            Ok(self.killed)
        }

        fn kill(&mut self) -> Result<(), ToolError> {
            self.kills.fetch_add(1, Ordering::SeqCst);
            self.killed = true;
            Ok(())
        }
    }

    fn watcher_fixture(
        button: MockButton,
    ) -> (CancelWatcher, Arc<SpeechSlot>, Arc<AtomicUsize>) {
        let slot = Arc::new(SpeechSlot::new());
        let kills = Arc::new(AtomicUsize::new(0));
        let watcher = CancelWatcher::new(
            Arc::new(button),
            Arc::clone(&slot),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );
        (watcher, slot, kills)
    }

    #[test]
    fn starts_disarmed() {
        let (watcher, _slot, _kills) = watcher_fixture(MockButton::released());
        assert!(!watcher.is_armed());
    }

    #[test]
    fn start_arms_and_stop_disarms() {
        let (mut watcher, _slot, _kills) = watcher_fixture(MockButton::released());
        watcher.start();
        assert!(watcher.is_armed());
        watcher.stop();
        assert!(!watcher.is_armed());
    }

    #[test]
    fn press_kills_published_speech() {
        let (mut watcher, slot, kills) = watcher_fixture(MockButton::held());

        let speech = Arc::new(ActiveSpeech::new(Box::new(NeverEndingProcess {
            kills: Arc::clone(&kills),
            killed: false,
        })));
        slot.publish(&speech);

        watcher.start();
        // Within a few poll intervals the kill must have been issued.
        let deadline = std::time::Instant::now() + Duration::from_millis(500);
        while kills.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        watcher.stop();

        assert_eq!(kills.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn press_with_empty_slot_is_a_noop() {
        let (mut watcher, _slot, kills) = watcher_fixture(MockButton::held());
        watcher.start();
        std::thread::sleep(Duration::from_millis(60));
        watcher.stop();
        assert_eq!(kills.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn watcher_does_not_self_disarm_after_killing() {
        let (mut watcher, slot, kills) = watcher_fixture(MockButton::held());

        let speech = Arc::new(ActiveSpeech::new(Box::new(NeverEndingProcess {
            kills: Arc::clone(&kills),
            killed: false,
        })));
        slot.publish(&speech);

        watcher.start();
        let deadline = std::time::Instant::now() + Duration::from_millis(500);
        while kills.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }

        // Still armed after the kill; only stop() disarms.
        assert!(watcher.is_armed());
        watcher.stop();
        assert!(!watcher.is_armed());
    }

    #[test]
    fn stop_without_start_is_safe() {
        let (mut watcher, _slot, _kills) = watcher_fixture(MockButton::released());
        watcher.stop();
        assert!(!watcher.is_armed());
    }
}
