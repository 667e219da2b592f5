//! Platform Abstraction Layer
//!
//! Raspberry Pi boards share one GPIO register layout but place the
//! peripheral block at a different physical address on each SoC generation.
//! This module names the generations and resolves each one to its base
//! address. The per-family constants are data; nothing else in the crate
//! branches on the family.
//!
//! # Usage
//!
//! ```
//! use rpi_gpiomem::platform::{HardwareFamily, resolve_by_family};
//!
//! let family = HardwareFamily::from_index(2)?;
//! assert_eq!(resolve_by_family(family).get(), 0x3f00_0000);
//! # Ok::<(), rpi_gpiomem::Error>(())
//! ```

pub mod bcm2835;

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// Distance from the peripheral base to the GPIO register block.
pub const GPIO_OFFSET: u32 = 0x20_0000;

/// SoC generation, which fixes the peripheral base address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HardwareFamily {
    /// Raspberry Pi 1 / Zero.
    Bcm2708,
    /// Raspberry Pi 2.
    Bcm2709,
    /// Raspberry Pi 3 / Zero 2.
    Bcm2710,
    /// Raspberry Pi 4.
    Bcm2711,
}

impl HardwareFamily {
    /// Every family, in selector order.
    pub const ALL: [HardwareFamily; 4] = [
        HardwareFamily::Bcm2708,
        HardwareFamily::Bcm2709,
        HardwareFamily::Bcm2710,
        HardwareFamily::Bcm2711,
    ];

    /// Look up a family by its numeric selector (0-3).
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidFamily(index))
    }

    /// Numeric selector of this family.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Lowercase SoC name, e.g. `"bcm2711"`.
    pub const fn name(self) -> &'static str {
        match self {
            HardwareFamily::Bcm2708 => "bcm2708",
            HardwareFamily::Bcm2709 => "bcm2709",
            HardwareFamily::Bcm2710 => "bcm2710",
            HardwareFamily::Bcm2711 => "bcm2711",
        }
    }

    const fn base_address(self) -> u32 {
        match self {
            HardwareFamily::Bcm2708 => 0x2000_0000,
            HardwareFamily::Bcm2709 => 0x3f00_0000,
            HardwareFamily::Bcm2710 => 0x3f00_0000,
            HardwareFamily::Bcm2711 => 0xfe00_0000,
        }
    }
}

impl TryFrom<u8> for HardwareFamily {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
    }
}

impl FromStr for HardwareFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFamilyName(s.to_owned()))
    }
}

impl fmt::Display for HardwareFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical address of the SoC peripheral block.
///
/// Zero is never a valid base, so an unset base is `Option::None`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PeripheralBase(u32);

impl PeripheralBase {
    /// Wrap a raw address; returns `None` for zero.
    pub const fn new(address: u32) -> Option<Self> {
        if address == 0 { None } else { Some(Self(address)) }
    }

    /// Raw physical address.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Physical address of the GPIO register block.
    pub const fn gpio_address(self) -> u64 {
        self.0 as u64 + GPIO_OFFSET as u64
    }
}

impl fmt::Display for PeripheralBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.get())
    }
}

/// Resolve a hardware family to its fixed peripheral base address.
pub const fn resolve_by_family(family: HardwareFamily) -> PeripheralBase {
    PeripheralBase(family.base_address())
}

// Default family selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2708")] {
        /// Family used when the configuration names none.
        pub const DEFAULT_FAMILY: Option<HardwareFamily> = Some(HardwareFamily::Bcm2708);
    } else if #[cfg(feature = "bcm2709")] {
        /// Family used when the configuration names none.
        pub const DEFAULT_FAMILY: Option<HardwareFamily> = Some(HardwareFamily::Bcm2709);
    } else if #[cfg(feature = "bcm2710")] {
        /// Family used when the configuration names none.
        pub const DEFAULT_FAMILY: Option<HardwareFamily> = Some(HardwareFamily::Bcm2710);
    } else if #[cfg(feature = "bcm2711")] {
        /// Family used when the configuration names none.
        pub const DEFAULT_FAMILY: Option<HardwareFamily> = Some(HardwareFamily::Bcm2711);
    } else {
        /// No family feature selected: the base is probed from iomem.
        pub const DEFAULT_FAMILY: Option<HardwareFamily> = None;
    }
}

// Ensure at most one family is selected
#[cfg(any(
    all(feature = "bcm2708", any(feature = "bcm2709", feature = "bcm2710", feature = "bcm2711")),
    all(feature = "bcm2709", any(feature = "bcm2710", feature = "bcm2711")),
    all(feature = "bcm2710", feature = "bcm2711"),
))]
compile_error!("Multiple hardware families selected! Choose one of: bcm2708, bcm2709, bcm2710, bcm2711");
