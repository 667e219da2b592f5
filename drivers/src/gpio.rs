//! GPIO controller: address resolution, window lifecycle and pin access.
//!
//! [`Gpio`] owns the current peripheral base, the physical-memory device
//! and at most one live register window. Pin operations validate their
//! arguments, then require a live window, then touch registers.
//!
//! `Gpio` does no locking. Callers sharing one instance between threads
//! must serialise every call (see [`crate::shared`]); the direction and
//! pull sequences are several register accesses long and not atomic.

use log::{debug, error, info};

use crate::config::{Config, MapFailurePolicy, MemDevice};
use crate::error::{Error, Result};
use crate::hal::gpio::{Direction, GpioController, PinLevel, PullMode};
use crate::hal::mmio::PhysicalMemory;
use crate::hal::timer::{Delay, StdDelay};
use crate::hw::devmem::DevMem;
use crate::hw::iomem;
use crate::platform::bcm2835::gpio::{self as pins, MAX_PIN, check_pin};
use crate::platform::bcm2835::pull;
use crate::platform::bcm2835::{BLOCK_SIZE, Bcm2835Gpio, RegisterReader, RegisterView};
use crate::platform::{HardwareFamily, PeripheralBase, resolve_by_family};

/// GPIO controller over a memory-mapped register window.
///
/// # Example
///
/// ```no_run
/// use rpi_gpiomem::{Config, Direction, Gpio, HardwareFamily, PinLevel};
///
/// let mut gpio = Gpio::new(Config::default().with_family(HardwareFamily::Bcm2711));
/// gpio.map()?;
/// gpio.set_direction(17, Direction::Output)?;
/// gpio.write_level(17, PinLevel::High)?;
/// gpio.unmap()?;
/// # Ok::<(), rpi_gpiomem::Error>(())
/// ```
pub struct Gpio<M: PhysicalMemory = DevMem, D: Delay = StdDelay> {
    config: Config,
    family: Option<HardwareFamily>,
    base: Option<PeripheralBase>,
    memory: M,
    window: Option<M::Window>,
    delay: D,
}

impl Gpio {
    /// Controller backed by the configured device node.
    ///
    /// Nothing is opened or mapped until [`map`](Self::map).
    pub fn new(config: Config) -> Self {
        let memory = DevMem::new(config.mem_device.clone());
        Self::with_backend(config, memory, StdDelay)
    }
}

impl<M: PhysicalMemory, D: Delay> Gpio<M, D> {
    /// Controller over any physical-memory device and delay provider.
    pub fn with_backend(config: Config, memory: M, delay: D) -> Self {
        let family = config.family;
        Self {
            config,
            family,
            base: family.map(resolve_by_family),
            memory,
            window: None,
            delay,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Selected family, or `None` if the base was probed or is unset.
    pub fn family(&self) -> Option<HardwareFamily> {
        self.family
    }

    /// Current peripheral base, or `None` if not yet resolved.
    pub fn base_address(&self) -> Option<PeripheralBase> {
        self.base
    }

    pub fn is_mapped(&self) -> bool {
        self.window.is_some()
    }

    /// The physical-memory device.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ------------------------------------------------------------------------
    // Address resolution
    // ------------------------------------------------------------------------

    /// Unmap if mapped, apply `update`, and map again if a window was live.
    fn remapping<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut Self),
    {
        let was_mapped = self.is_mapped();
        if was_mapped {
            info!("unmapping live window before changing the peripheral base");
            self.unmap()?;
        }

        update(&mut *self);

        if was_mapped {
            info!("remapping at the new peripheral base");
            self.map()?;
        }
        Ok(())
    }

    /// Select a hardware family and move the window to its base address.
    ///
    /// A live window is unmapped first, the base is recomputed, and only then
    /// is a new window mapped. An unmap failure aborts the switch with the
    /// old base and window intact.
    pub fn switch_family(&mut self, family: HardwareFamily) -> Result<()> {
        self.remapping(|gpio| {
            let base = resolve_by_family(family);
            info!("switching to {family} at {base}");
            gpio.family = Some(family);
            gpio.base = Some(base);
        })
    }

    /// Probe the iomem listing and adopt the base address it names.
    ///
    /// Probing happens before anything is unmapped, so a failed probe leaves
    /// the current base and window untouched.
    pub fn detect(&mut self) -> Result<PeripheralBase> {
        let base = iomem::probe_base_address(&self.config.iomem_path)?;
        self.remapping(|gpio| {
            gpio.family = None;
            gpio.base = Some(base);
        })?;
        Ok(base)
    }

    // ------------------------------------------------------------------------
    // Window lifecycle
    // ------------------------------------------------------------------------

    /// Map the GPIO register window.
    ///
    /// A live window is unmapped first. On [`MemDevice::DevMem`] the window
    /// sits at the peripheral base plus the GPIO offset, and with no base
    /// resolved yet the iomem listing is probed. [`MemDevice::GpioMem`]
    /// always maps offset 0. If `mmap` itself fails the configured
    /// [`MapFailurePolicy`] applies; by default the process exits.
    pub fn map(&mut self) -> Result<()> {
        self.unmap()?;

        let offset = match self.config.device {
            MemDevice::GpioMem => 0,
            MemDevice::DevMem => match self.base {
                Some(base) => base.gpio_address(),
                None => {
                    let base = iomem::probe_base_address(&self.config.iomem_path)?;
                    self.base = Some(base);
                    base.gpio_address()
                }
            },
        };

        match self.memory.map(offset, BLOCK_SIZE) {
            Ok(window) => {
                debug!(
                    "gpio window live at offset {offset:#010x} of {}",
                    self.config.mem_device.display()
                );
                self.window = Some(window);
                Ok(())
            }
            Err(e @ Error::MapFailed { .. }) => self.escalate(e),
            Err(e) => Err(e),
        }
    }

    fn escalate(&self, e: Error) -> Result<()> {
        match self.config.map_failure {
            MapFailurePolicy::Exit => {
                error!("{e}; cannot continue without the gpio window");
                std::process::exit(1)
            }
            MapFailurePolicy::Propagate => Err(e),
        }
    }

    /// Release the register window.
    ///
    /// Unmapping with no live window succeeds. If the release fails the
    /// window stays live and the call can be retried.
    pub fn unmap(&mut self) -> Result<()> {
        let Some(window) = self.window.as_mut() else {
            return Ok(());
        };

        self.memory.unmap(window)?;
        self.window = None;
        debug!("gpio window released");
        Ok(())
    }

    fn registers(&mut self) -> Result<RegisterView<'_, M::Window>> {
        let window = self.window.as_mut().ok_or(Error::NotMapped)?;
        RegisterView::new(window)
    }

    fn reader(&self) -> Result<RegisterReader<'_, M::Window>> {
        let window = self.window.as_ref().ok_or(Error::NotMapped)?;
        RegisterReader::new(window)
    }

    /// HAL view of the live window.
    pub fn controller(&mut self) -> Result<Bcm2835Gpio<'_, M::Window, D>> {
        let window = self.window.as_mut().ok_or(Error::NotMapped)?;
        Ok(Bcm2835Gpio::new(
            RegisterView::new(window)?,
            &mut self.delay,
            self.config.pull_delay,
        ))
    }

    // ------------------------------------------------------------------------
    // Pin operations
    // ------------------------------------------------------------------------

    /// Check that `pin` is within `0..=MAX_PIN`.
    pub fn validate_pin(&self, pin: u8) -> Result<()> {
        check_pin(pin)
    }

    pub fn set_direction(&mut self, pin: u8, direction: Direction) -> Result<()> {
        check_pin(pin)?;
        pins::set_direction(&mut self.registers()?, pin, direction)
    }

    pub fn write_level(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        check_pin(pin)?;
        pins::write_level(&mut self.registers()?, pin, level)
    }

    pub fn read_level(&self, pin: u8) -> Result<PinLevel> {
        check_pin(pin)?;
        pins::read_level(&self.reader()?, pin)
    }

    /// Drive the opposite of the pin's current level; returns the new level.
    pub fn toggle(&mut self, pin: u8) -> Result<PinLevel> {
        check_pin(pin)?;
        self.controller()?.toggle(pin)
    }

    /// Configure the pin's pull resistor.
    ///
    /// `delay_us` is the settle time between phases; `None` or a negative
    /// value uses the configured default. The call blocks for three settle
    /// periods and cannot be interrupted.
    pub fn configure_pull(&mut self, pin: u8, mode: PullMode, delay_us: Option<i64>) -> Result<()> {
        check_pin(pin)?;
        let wait = pull::pull_delay(delay_us, self.config.pull_delay);

        let window = self.window.as_mut().ok_or(Error::NotMapped)?;
        let mut regs = RegisterView::new(window)?;
        pull::configure_pull(&mut regs, &mut self.delay, pin, mode, wait)
    }

    /// Return every pin to input with no pull resistor.
    pub fn reset(&mut self) -> Result<()> {
        let mut controller = self.controller()?;
        for pin in 0..=MAX_PIN {
            controller.set_direction(pin, Direction::Input)?;
            controller.set_pull(pin, PullMode::None)?;
        }
        info!("reset pins 0-{MAX_PIN} to input, no pull");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::{Access, AccessLog, MockMemory, RecordingDelay};

    fn mock_gpio(family: Option<HardwareFamily>) -> (Gpio<MockMemory, RecordingDelay>, AccessLog) {
        let log = AccessLog::new();
        let config = Config::new(family)
            .with_iomem_path("/nonexistent/iomem")
            .with_map_failure(MapFailurePolicy::Propagate);
        let gpio = Gpio::with_backend(config, MockMemory::new(log.clone()), RecordingDelay::new(log.clone()));
        (gpio, log)
    }

    #[test]
    fn new_controller_resolves_configured_family() {
        let (gpio, log) = mock_gpio(Some(HardwareFamily::Bcm2709));
        assert_eq!(gpio.base_address().map(PeripheralBase::get), Some(0x3f00_0000));
        assert!(!gpio.is_mapped());
        assert!(log.events().is_empty());
    }

    #[test]
    fn map_without_base_probes_and_reports_not_found() {
        let (mut gpio, log) = mock_gpio(None);
        assert!(matches!(gpio.map(), Err(Error::AddressNotFound)));
        assert!(!gpio.is_mapped());
        assert!(log.events().is_empty());
    }

    #[test]
    fn map_targets_base_plus_gpio_offset() {
        let (mut gpio, log) = mock_gpio(Some(HardwareFamily::Bcm2711));
        gpio.map().unwrap();
        assert_eq!(
            log.events(),
            vec![Access::Map {
                address: 0xfe20_0000,
                len: 4096
            }]
        );
    }

    #[test]
    fn gpiomem_maps_offset_zero_without_a_base() {
        let log = AccessLog::new();
        let config = Config::new(None)
            .with_device(MemDevice::GpioMem)
            .with_iomem_path("/nonexistent/iomem")
            .with_map_failure(MapFailurePolicy::Propagate);
        let mut gpio = Gpio::with_backend(config, MockMemory::new(log.clone()), RecordingDelay::new(log.clone()));

        gpio.map().unwrap();
        gpio.switch_family(HardwareFamily::Bcm2711).unwrap();

        assert_eq!(gpio.base_address().map(PeripheralBase::get), Some(0xfe00_0000));
        assert_eq!(
            log.events(),
            vec![
                Access::Map { address: 0, len: 4096 },
                Access::Unmap { address: 0 },
                Access::Map { address: 0, len: 4096 },
            ]
        );
    }

    #[test]
    fn second_map_unmaps_first() {
        let (mut gpio, log) = mock_gpio(Some(HardwareFamily::Bcm2708));
        gpio.map().unwrap();
        gpio.map().unwrap();
        assert_eq!(
            log.events(),
            vec![
                Access::Map { address: 0x2020_0000, len: 4096 },
                Access::Unmap { address: 0x2020_0000 },
                Access::Map { address: 0x2020_0000, len: 4096 },
            ]
        );
    }

    #[test]
    fn pin_operations_need_a_window() {
        let (mut gpio, _) = mock_gpio(Some(HardwareFamily::Bcm2710));
        assert!(matches!(gpio.set_direction(4, Direction::Output), Err(Error::NotMapped)));
        assert!(matches!(gpio.write_level(4, PinLevel::High), Err(Error::NotMapped)));
        assert!(matches!(gpio.read_level(4), Err(Error::NotMapped)));
        assert!(matches!(gpio.configure_pull(4, PullMode::Up, None), Err(Error::NotMapped)));
        assert!(matches!(gpio.reset(), Err(Error::NotMapped)));
    }

    #[test]
    fn invalid_pin_wins_over_missing_window() {
        let (mut gpio, _) = mock_gpio(Some(HardwareFamily::Bcm2710));
        assert!(matches!(gpio.write_level(28, PinLevel::High), Err(Error::InvalidPin(28))));
    }

    #[test]
    fn map_failure_propagates_under_propagate_policy() {
        let (mut gpio, _) = mock_gpio(Some(HardwareFamily::Bcm2710));
        gpio.memory_mut().fail_next_map();
        assert!(matches!(
            gpio.map(),
            Err(Error::MapFailed { address: 0x3f20_0000, .. })
        ));
        assert!(!gpio.is_mapped());
    }

    #[test]
    fn reset_returns_every_pin_to_input_without_pull() {
        let (mut gpio, log) = mock_gpio(Some(HardwareFamily::Bcm2710));
        gpio.map().unwrap();
        gpio.memory().poke(0, 0o1111111111);
        gpio.memory().poke(2, 0o11111111);
        gpio.reset().unwrap();

        for bank in 0..3 {
            assert_eq!(gpio.memory().peek(bank), 0);
        }
        let clocked: Vec<u32> = log
            .writes()
            .into_iter()
            .filter(|&(word, value)| word == 38 && value != 0)
            .map(|(_, value)| value)
            .collect();
        assert_eq!(clocked, (0..=MAX_PIN).map(|pin| 1u32 << pin).collect::<Vec<_>>());
    }
}
