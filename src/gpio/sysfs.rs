//! Linux sysfs GPIO implementation.
//!
//! Pins are driven through `/sys/class/gpio`: write the pin number to
//! `export`, set `gpioN/direction`, then read or write `gpioN/value`.
//! [`SysfsPin::release`] unexports the pin so the line is left in a safe
//! state on shutdown.
//!
//! The sysfs base directory is injectable so the unit tests can run against
//! a plain temp directory instead of real hardware.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::{ButtonInput, Indicator, InputState};

/// Default kernel GPIO directory.
const SYSFS_BASE: &str = "/sys/class/gpio";

// ---------------------------------------------------------------------------
// GpioError
// ---------------------------------------------------------------------------

/// Errors raised while opening or releasing a pin.  All of them are fatal to
/// startup — the device cannot function without its button and LED.
#[derive(Debug, Error)]
pub enum GpioError {
    /// Writing the pin number to the `export` file failed.
    #[error("cannot export GPIO {pin}: {source}")]
    Export { pin: u8, source: io::Error },

    /// Writing `in`/`out` to the `direction` file failed.
    #[error("cannot set direction on GPIO {pin}: {source}")]
    Direction { pin: u8, source: io::Error },

    /// Writing the pin number to the `unexport` file failed.
    #[error("cannot unexport GPIO {pin}: {source}")]
    Unexport { pin: u8, source: io::Error },
}

// ---------------------------------------------------------------------------
// SysfsPin
// ---------------------------------------------------------------------------

/// One exported sysfs GPIO line.
#[derive(Debug)]
pub struct SysfsPin {
    number: u8,
    base: PathBuf,
    value_path: PathBuf,
}

impl SysfsPin {
    /// Export `number` under the default `/sys/class/gpio` base and set its
    /// direction (`"in"` or `"out"`).
    pub fn open(number: u8, direction: &str) -> Result<Self, GpioError> {
        Self::open_at(Path::new(SYSFS_BASE), number, direction)
    }

    /// Same as [`open`](Self::open) against an explicit base directory.
    pub fn open_at(base: &Path, number: u8, direction: &str) -> Result<Self, GpioError> {
        let export = base.join("export");
        if let Err(source) = fs::write(&export, number.to_string()) {
            // EBUSY means the pin is already exported (e.g. after a crash
            // that skipped cleanup) — reuse it.
            if source.raw_os_error() != Some(EBUSY) {
                return Err(GpioError::Export { pin: number, source });
            }
        }

        let pin_dir = base.join(format!("gpio{number}"));

        // udev takes a moment to apply group permissions on the freshly
        // created gpioN files.
        std::thread::sleep(Duration::from_millis(50));

        fs::write(pin_dir.join("direction"), direction)
            .map_err(|source| GpioError::Direction { pin: number, source })?;

        Ok(Self {
            number,
            base: base.to_path_buf(),
            value_path: pin_dir.join("value"),
        })
    }

    /// Read the raw line level.  `true` = high.
    ///
    /// A read failure after a successful open means the kernel yanked the
    /// line out from under us; that is unrecoverable, so abort.
    pub fn level(&self) -> bool {
        let raw = fs::read_to_string(&self.value_path)
            .unwrap_or_else(|e| panic!("GPIO {} read failed: {e}", self.number));
        raw.trim() == "1"
    }

    /// Drive the line.  `true` = high.  Aborts on failure, same as
    /// [`level`](Self::level).
    pub fn drive(&self, high: bool) {
        let v = if high { "1" } else { "0" };
        fs::write(&self.value_path, v)
            .unwrap_or_else(|e| panic!("GPIO {} write failed: {e}", self.number));
    }

    /// Unexport the pin, releasing the line back to the kernel.
    pub fn release(&self) -> Result<(), GpioError> {
        fs::write(self.base.join("unexport"), self.number.to_string()).map_err(|source| {
            GpioError::Unexport {
                pin: self.number,
                source,
            }
        })
    }

    pub fn number(&self) -> u8 {
        self.number
    }
}

/// `EBUSY` on Linux — returned by `export` when the pin is already exported.
const EBUSY: i32 = 16;

// ---------------------------------------------------------------------------
// SysfsButton
// ---------------------------------------------------------------------------

/// The physical button, wired active-low with a pull-up.
#[derive(Debug)]
pub struct SysfsButton {
    pin: SysfsPin,
}

impl SysfsButton {
    pub fn open(number: u8) -> Result<Self, GpioError> {
        Ok(Self {
            pin: SysfsPin::open(number, "in")?,
        })
    }

    pub fn open_at(base: &Path, number: u8) -> Result<Self, GpioError> {
        Ok(Self {
            pin: SysfsPin::open_at(base, number, "in")?,
        })
    }

    pub fn release(&self) -> Result<(), GpioError> {
        self.pin.release()
    }
}

impl ButtonInput for SysfsButton {
    fn read(&self) -> InputState {
        // Pull-up: low means pressed.
        if self.pin.level() {
            InputState::Released
        } else {
            InputState::Pressed
        }
    }
}

// ---------------------------------------------------------------------------
// SysfsLed
// ---------------------------------------------------------------------------

/// The button's ready LED, active-high.
#[derive(Debug)]
pub struct SysfsLed {
    pin: SysfsPin,
}

impl SysfsLed {
    pub fn open(number: u8) -> Result<Self, GpioError> {
        Ok(Self {
            pin: SysfsPin::open(number, "out")?,
        })
    }

    pub fn open_at(base: &Path, number: u8) -> Result<Self, GpioError> {
        Ok(Self {
            pin: SysfsPin::open_at(base, number, "out")?,
        })
    }

    pub fn release(&self) -> Result<(), GpioError> {
        self.pin.release()
    }
}

impl Indicator for SysfsLed {
    fn set(&self, on: bool) {
        log::debug!("led({})", if on { 1 } else { 0 });
        self.pin.drive(on);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
