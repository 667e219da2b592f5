//! Raspberry Pi GPIO through a memory-mapped register window
//!
//! This crate drives GPIO pins 0-27 on BCM2708-BCM2711 boards from user space
//! by mapping the GPIO block out of `/dev/mem` and issuing volatile register
//! reads and writes.
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent traits (GPIO, register windows, delays)
//! - [`platform`]: Hardware families, peripheral base addresses and the
//!   BCM2835-family register sequences
//! - [`hw`]: Host backends: `/dev/mem` and `/dev/gpiomem`, `/proc/iomem`, an in-memory
//!   substitute that records every access
//! - [`gpio`]: The [`Gpio`] controller that ties them together
//! - [`shared`]: A process-wide controller for multi-threaded callers
//!
//! # Usage Example
//!
//! ```no_run
//! use rpi_gpiomem::{Config, Direction, Gpio, PinLevel, PullMode};
//!
//! let mut gpio = Gpio::new(Config::default());
//! gpio.detect()?;
//! gpio.map()?;
//!
//! gpio.set_direction(17, Direction::Output)?;
//! gpio.write_level(17, PinLevel::High)?;
//!
//! gpio.set_direction(4, Direction::Input)?;
//! gpio.configure_pull(4, PullMode::Up, None)?;
//! let level = gpio.read_level(4)?;
//!
//! gpio.unmap()?;
//! # let _ = level;
//! # Ok::<(), rpi_gpiomem::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod gpio;
pub mod hal;
pub mod hw;
pub mod platform;
pub mod shared;

// Re-export commonly used types
pub use config::{Config, MapFailurePolicy, MemDevice};
pub use error::{Error, Result};
pub use gpio::Gpio;
pub use hal::gpio::{Direction, GpioController, PinLevel, PullMode};
pub use hw::iomem::probe_base_address;
pub use platform::bcm2835::MAX_PIN;
pub use platform::{HardwareFamily, PeripheralBase, resolve_by_family};
