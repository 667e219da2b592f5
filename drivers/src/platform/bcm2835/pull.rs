//! Pull-up/down resistor programming.
//!
//! GPPUD and GPPUDCLK0 are write-only and edge-triggered: the control value
//! is latched into a pad only when that pad's clock bit is strobed, and the
//! hardware never reports the current pull state. The sequence is:
//!
//! 1. Write 0 to GPPUD, wait.
//! 2. Write the pull code to GPPUD, wait.
//! 3. Write the pin's bit to GPPUDCLK0, wait.
//! 4. Write 0 to GPPUD, then 0 to GPPUDCLK0.
//!
//! The order is a hardware contract. Waits are blocking and cannot be
//! cancelled.

use std::time::Duration;

use log::debug;

use super::gpio::check_pin;
use super::regs::{RegisterRole, RegisterView};
use crate::error::Result;
use crate::hal::gpio::PullMode;
use crate::hal::mmio::RegisterBlock;
use crate::hal::timer::Delay;

/// Settle time used when the caller gives none.
pub const DEFAULT_PULL_DELAY: Duration = Duration::from_micros(100);

/// Normalise a caller-supplied wait in microseconds.
///
/// A missing or negative value becomes `default`.
pub fn pull_delay(delay_us: Option<i64>, default: Duration) -> Duration {
    match delay_us {
        Some(us) if us >= 0 => Duration::from_micros(us as u64),
        _ => default,
    }
}

/// Run the four-phase pull sequence for `pin`.
pub fn configure_pull<W: RegisterBlock, D: Delay>(
    regs: &mut RegisterView<'_, W>,
    delay: &mut D,
    pin: u8,
    mode: PullMode,
    wait: Duration,
) -> Result<()> {
    check_pin(pin)?;
    debug!("gpio {pin}: pull {mode:?}, settle {wait:?}");

    regs.write(RegisterRole::PullControl, 0);
    delay.delay(wait);

    regs.write(RegisterRole::PullControl, mode.code());
    delay.delay(wait);

    regs.write(RegisterRole::PullClock, 1 << pin);
    delay.delay(wait);

    regs.write(RegisterRole::PullControl, 0);
    regs.write(RegisterRole::PullClock, 0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_negative_delay_uses_default() {
        assert_eq!(pull_delay(None, DEFAULT_PULL_DELAY), DEFAULT_PULL_DELAY);
        assert_eq!(pull_delay(Some(-1), DEFAULT_PULL_DELAY), DEFAULT_PULL_DELAY);
        assert_eq!(pull_delay(Some(i64::MIN), DEFAULT_PULL_DELAY), DEFAULT_PULL_DELAY);
    }

    #[test]
    fn explicit_delay_is_kept() {
        assert_eq!(pull_delay(Some(0), DEFAULT_PULL_DELAY), Duration::ZERO);
        assert_eq!(pull_delay(Some(250), DEFAULT_PULL_DELAY), Duration::from_micros(250));
    }
}
