//! GPIO abstractions — the physical button and the ready LED.
//!
//! # Design
//!
//! The controller only ever talks to the [`ButtonInput`] and [`Indicator`]
//! traits.  Both are object-safe and `Send + Sync` so they can be held behind
//! `Arc<dyn …>` and shared between the main loop and the cancel watcher
//! thread.
//!
//! [`SysfsButton`] and [`SysfsLed`] are the production implementations on top
//! of the Linux sysfs GPIO interface.  Opening a pin can fail and is fatal at
//! startup; a read or write failure *after* a successful open aborts the
//! process — there is no meaningful recovery from a wedged pin on a headless
//! device.
//!
//! # Electrical convention
//!
//! The button pin uses pull-up idle-high wiring: the line reads high (`1`)
//! while released and is pulled low (`0`) when pressed.  The LED is
//! active-high.

pub mod sysfs;

pub use sysfs::{GpioError, SysfsButton, SysfsLed, SysfsPin};

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

/// Instantaneous sample of the physical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// The line is pulled low — the user is holding the button down.
    Pressed,
    /// The line is idle-high.
    Released,
}

// ---------------------------------------------------------------------------
// ButtonInput / Indicator
// ---------------------------------------------------------------------------

/// Non-blocking sample of the physical control.
///
/// # Contract
///
/// - `read` returns immediately; debounce is the caller's own polling
///   interval, not this trait's concern.
/// - No error channel: a hardware read failure aborts the process.
pub trait ButtonInput: Send + Sync {
    fn read(&self) -> InputState;
}

/// Binary ready indicator shown to the user.
///
/// `set` is idempotent; setting the current state again is harmless.  The
/// indicator must be OFF for the whole capture-to-speech stretch of a read
/// cycle and ON whenever the device is idle and ready for a press.
pub trait Indicator: Send + Sync {
    fn set(&self, on: bool);
}

// Compile-time assertion: both traits must remain object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: &dyn ButtonInput, _: &dyn Indicator) {}
};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use doubles::{MockButton, MockIndicator};


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
