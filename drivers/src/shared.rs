//! Process-wide controller.
//!
//! Threads that share the GPIO block go through one [`Gpio`] behind a
//! spinlock, which serialises the multi-step direction and pull sequences.
//! The controller is built from [`Config::default`] on first use.
//!
//! The lock is held for the whole closure, including every settle delay.
//! One pull sequence holds it for three delays (300 µs by default), and
//! [`Gpio::reset`] runs one per pin, roughly 8 ms. Waiting threads spin
//! for that long rather than sleep, so keep long sequences off threads
//! that cannot afford to busy-wait.

use spin::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::gpio::Gpio;

static SHARED: Mutex<Option<Gpio>> = Mutex::new(None);

/// The process-wide controller slot.
pub fn shared() -> &'static Mutex<Option<Gpio>> {
    &SHARED
}

/// Run `f` with exclusive access to the process-wide controller.
pub fn with_shared<R>(f: impl FnOnce(&mut Gpio) -> Result<R>) -> Result<R> {
    let mut slot = SHARED.lock();
    let gpio = slot.get_or_insert_with(|| Gpio::new(Config::default()));
    f(gpio)
}
