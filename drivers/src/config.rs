//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::hw::devmem::{DEFAULT_GPIOMEM_DEVICE, DEFAULT_MEM_DEVICE};
use crate::hw::iomem::DEFAULT_IOMEM_PATH;
use crate::platform::{DEFAULT_FAMILY, HardwareFamily};
use crate::platform::bcm2835::DEFAULT_PULL_DELAY;

/// What [`Gpio::map`](crate::Gpio::map) does when `mmap` itself fails.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MapFailurePolicy {
    /// Log the error and terminate the process with exit status 1.
    #[default]
    Exit,
    /// Return [`Error::MapFailed`](crate::Error::MapFailed) to the caller.
    Propagate,
}

/// Kind of physical-memory device the window is mapped from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MemDevice {
    /// All of physical memory; the window sits at the peripheral base plus
    /// the GPIO offset. Needs root.
    #[default]
    DevMem,
    /// The kernel's GPIO-only device; the block starts at offset 0 and no
    /// peripheral base is needed. Usable by the `gpio` group.
    GpioMem,
}

impl MemDevice {
    /// Standard device node for this kind.
    pub const fn default_path(self) -> &'static str {
        match self {
            MemDevice::DevMem => DEFAULT_MEM_DEVICE,
            MemDevice::GpioMem => DEFAULT_GPIOMEM_DEVICE,
        }
    }
}

/// GPIO controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Kind of device at `mem_device`; decides the mapping offset.
    pub device: MemDevice,
    /// Physical-memory device to map the register window from.
    pub mem_device: PathBuf,
    /// iomem listing probed when no family is selected.
    pub iomem_path: PathBuf,
    /// Hardware family; `None` means probe on first map.
    pub family: Option<HardwareFamily>,
    /// Settle time between pull-sequence phases.
    pub pull_delay: Duration,
    /// Escalation for `mmap` failures.
    pub map_failure: MapFailurePolicy,
}

impl Config {
    /// Standard paths and timings for the given family.
    pub fn new(family: Option<HardwareFamily>) -> Self {
        Self {
            device: MemDevice::DevMem,
            mem_device: PathBuf::from(DEFAULT_MEM_DEVICE),
            iomem_path: PathBuf::from(DEFAULT_IOMEM_PATH),
            family,
            pull_delay: DEFAULT_PULL_DELAY,
            map_failure: MapFailurePolicy::default(),
        }
    }

    pub fn with_family(mut self, family: HardwareFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Switch device kind and reset `mem_device` to that kind's node.
    pub fn with_device(mut self, device: MemDevice) -> Self {
        self.device = device;
        self.mem_device = PathBuf::from(device.default_path());
        self
    }

    /// Override the device node; the device kind is unchanged.
    pub fn with_mem_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.mem_device = path.into();
        self
    }

    pub fn with_iomem_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.iomem_path = path.into();
        self
    }

    pub fn with_pull_delay(mut self, delay: Duration) -> Self {
        self.pull_delay = delay;
        self
    }

    pub fn with_map_failure(mut self, policy: MapFailurePolicy) -> Self {
        self.map_failure = policy;
        self
    }
}

impl Default for Config {
    /// Default configuration: `/dev/mem`, `/proc/iomem`, 100 µs pull settle
    /// time, the family picked by Cargo features, exit on map failure.
    fn default() -> Self {
        Self::new(DEFAULT_FAMILY)
    }
}
