//! BCM2835 GPIO Controller Driver
//!
//! This module provides both the raw register sequences and a HAL
//! implementation for the BCM2835-family GPIO controller. Every function
//! validates the pin before it touches a register.

use std::time::Duration;

use log::debug;

use super::pull;
use super::regs::{RegisterReader, RegisterRole, RegisterView};
use crate::error::{Error, Result};
use crate::hal::gpio::{Direction, GpioController, PinLevel, PullMode};
use crate::hal::mmio::RegisterBlock;
use crate::hal::timer::Delay;

/// Highest pin number accepted by this driver.
pub const MAX_PIN: u8 = 27;

/// Width mask of one function-select field.
const FSEL_MASK: u32 = 0b111;

/// Function-select encoding for output. Input is the cleared field.
const FSEL_OUTPUT: u32 = 0b001;

/// Validate that a GPIO pin number is in range.
pub fn check_pin(pin: u8) -> Result<()> {
    if pin <= MAX_PIN {
        Ok(())
    } else {
        Err(Error::InvalidPin(pin))
    }
}

/// Bank and bit shift of `pin`'s function-select field.
fn fsel_field(pin: u8) -> (RegisterRole, u32) {
    (RegisterRole::function_select(pin), (pin % 10) as u32 * 3)
}

/// Single-bit mask of `pin` in the Set, Clear, Level and PullClock registers.
fn pin_bit(pin: u8) -> u32 {
    1u32 << pin
}

// ============================================================================
// Raw Register Sequences
// ============================================================================

/// Configure a pin as input or output.
///
/// Input clears the pin's 3-bit function-select field. Output first clears
/// the field in its own write and then ORs in the output bit, so no stale
/// alternate-function bits survive.
pub fn set_direction<W: RegisterBlock>(
    regs: &mut RegisterView<'_, W>,
    pin: u8,
    direction: Direction,
) -> Result<()> {
    check_pin(pin)?;
    let (fsel, shift) = fsel_field(pin);

    regs.modify(fsel, |val| val & !(FSEL_MASK << shift));

    if direction == Direction::Output {
        regs.modify(fsel, |val| val | (FSEL_OUTPUT << shift));
    }

    debug!("gpio {pin}: direction {direction:?}");
    Ok(())
}

/// Drive a pin high or low.
///
/// High writes the pin's bit to GPSET0, low to GPCLR0. Both are write-only
/// registers where zero bits are ignored, so no read-modify-write is needed.
pub fn write_level<W: RegisterBlock>(
    regs: &mut RegisterView<'_, W>,
    pin: u8,
    level: PinLevel,
) -> Result<()> {
    check_pin(pin)?;

    let role = match level {
        PinLevel::High => RegisterRole::Set,
        PinLevel::Low => RegisterRole::Clear,
    };
    regs.write(role, pin_bit(pin));

    debug!("gpio {pin}: level {level:?}");
    Ok(())
}

/// Read the current logic level of a pin.
pub fn read_level<W: RegisterBlock>(regs: &RegisterReader<'_, W>, pin: u8) -> Result<PinLevel> {
    check_pin(pin)?;
    Ok(PinLevel::from(regs.read(RegisterRole::Level) & pin_bit(pin) != 0))
}

// ============================================================================
// HAL Implementation
// ============================================================================

/// BCM2835 GPIO controller over a live register window.
pub struct Bcm2835Gpio<'a, W: RegisterBlock, D: Delay> {
    regs: RegisterView<'a, W>,
    delay: &'a mut D,
    pull_delay: Duration,
}

impl<'a, W: RegisterBlock, D: Delay> Bcm2835Gpio<'a, W, D> {
    /// Create a controller.
    ///
    /// `pull_delay` is the settle time used between pull-sequence phases.
    pub fn new(regs: RegisterView<'a, W>, delay: &'a mut D, pull_delay: Duration) -> Self {
        Self {
            regs,
            delay,
            pull_delay,
        }
    }
}

impl<W: RegisterBlock, D: Delay> GpioController for Bcm2835Gpio<'_, W, D> {
    type Pin = u8;
    type Error = Error;

    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<()> {
        set_direction(&mut self.regs, pin, direction)
    }

    fn set_pull(&mut self, pin: Self::Pin, pull: PullMode) -> Result<()> {
        pull::configure_pull(&mut self.regs, self.delay, pin, pull, self.pull_delay)
    }

    fn set_high(&mut self, pin: Self::Pin) -> Result<()> {
        write_level(&mut self.regs, pin, PinLevel::High)
    }

    fn set_low(&mut self, pin: Self::Pin) -> Result<()> {
        write_level(&mut self.regs, pin, PinLevel::Low)
    }

    fn read(&self, pin: Self::Pin) -> Result<PinLevel> {
        read_level(&self.regs.reader(), pin)
    }
}
