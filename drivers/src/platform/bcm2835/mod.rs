//! BCM2835-family GPIO block.
//!
//! BCM2708 through BCM2711 share this register layout for pins 0-27; only
//! the peripheral base differs (see [`crate::platform::HardwareFamily`]).

pub mod gpio;
pub mod pull;
pub mod regs;

pub use gpio::{Bcm2835Gpio, MAX_PIN};
pub use pull::DEFAULT_PULL_DELAY;
pub use regs::{BLOCK_SIZE, BLOCK_WORDS, RegisterReader, RegisterRole, RegisterView};
