//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! This module defines platform-independent types and traits for GPIO control.
//! The integer conversions accept the numeric selectors used by the
//! application layer and reject anything out of range.

use crate::error::Error;

/// Pin logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    /// Logic low (0V or ground).
    Low,
    /// Logic high (3.3V).
    High,
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        matches!(level, PinLevel::High)
    }
}

impl TryFrom<u8> for PinLevel {
    type Error = Error;

    /// `0` is low, `1` is high.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PinLevel::Low),
            1 => Ok(PinLevel::High),
            other => Err(Error::InvalidLevel(other)),
        }
    }
}

impl core::ops::Not for PinLevel {
    type Output = PinLevel;

    fn not(self) -> PinLevel {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

/// Pin direction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    /// `0` is input, `1` is output.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Input),
            1 => Ok(Direction::Output),
            other => Err(Error::InvalidDirection(other)),
        }
    }
}

/// Internal pull resistor configuration.
///
/// The discriminant is the code written to the pull-control register.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PullMode {
    /// No pull resistor (high impedance).
    None = 0,
    /// Enable internal pull-down resistor.
    Down = 1,
    /// Enable internal pull-up resistor.
    Up = 2,
}

impl PullMode {
    /// Value written to the pull-control register.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u8> for PullMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PullMode::None),
            1 => Ok(PullMode::Down),
            2 => Ok(PullMode::Up),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

/// GPIO controller trait.
///
/// This trait represents a GPIO controller capable of configuring
/// and controlling multiple GPIO pins.
///
/// # Type Parameters
///
/// - `Pin`: Platform-specific pin identifier (typically `u8` or typed)
/// - `Error`: Error type for operations that can fail
pub trait GpioController {
    /// Platform-specific pin identifier.
    type Pin: Copy + Clone;

    /// Error type for GPIO operations.
    type Error: core::fmt::Debug;

    /// Configure a pin as input or output.
    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<(), Self::Error>;

    /// Configure the internal pull resistor for a pin.
    fn set_pull(&mut self, pin: Self::Pin, pull: PullMode) -> Result<(), Self::Error>;

    /// Set a pin to logic high.
    fn set_high(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Set a pin to logic low.
    fn set_low(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Read the current logic level of a pin.
    fn read(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Set the pin to a specific level.
    fn set_level(&mut self, pin: Self::Pin, level: PinLevel) -> Result<(), Self::Error> {
        match level {
            PinLevel::High => self.set_high(pin),
            PinLevel::Low => self.set_low(pin),
        }
    }

    /// Toggle the output state of a pin.
    ///
    /// Returns the level that was written.
    fn toggle(&mut self, pin: Self::Pin) -> Result<PinLevel, Self::Error> {
        let level = !self.read(pin)?;
        self.set_level(pin, level)?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_selectors_reject_out_of_range() {
        assert_eq!(PinLevel::try_from(1u8).unwrap(), PinLevel::High);
        assert!(matches!(PinLevel::try_from(2u8), Err(Error::InvalidLevel(2))));

        assert_eq!(Direction::try_from(0u8).unwrap(), Direction::Input);
        assert!(matches!(
            Direction::try_from(7u8),
            Err(Error::InvalidDirection(7))
        ));

        assert_eq!(PullMode::try_from(2u8).unwrap(), PullMode::Up);
        assert!(matches!(PullMode::try_from(3u8), Err(Error::InvalidMode(3))));
    }

    #[test]
    fn pull_codes_match_register_encoding() {
        assert_eq!(PullMode::None.code(), 0);
        assert_eq!(PullMode::Down.code(), 1);
        assert_eq!(PullMode::Up.code(), 2);
    }

    #[test]
    fn level_negation() {
        assert_eq!(!PinLevel::High, PinLevel::Low);
        assert_eq!(!PinLevel::Low, PinLevel::High);
        assert!(bool::from(PinLevel::High));
    }
}
