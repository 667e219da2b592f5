//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines the seams between the GPIO core and the outside
//! world. Application code talks to [`gpio::GpioController`]; the core
//! talks to memory through [`mmio`] and to the clock through [`timer`].
//! Each seam can be backed by real hardware or by a substitute.
//!
//! # Available Interfaces
//!
//! - [`gpio`]: General Purpose Input/Output control
//! - [`mmio`]: Register windows and the physical-memory device that maps them
//! - [`timer`]: Blocking delays

pub mod gpio;
pub mod mmio;
pub mod timer;
