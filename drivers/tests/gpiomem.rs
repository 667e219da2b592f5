//! Real `mmap` through `DevMem`, against a one-page file laid out like
//! `/dev/gpiomem`. Only one window may be live per process, so everything
//! runs in a single test.

use std::fs;
use std::panic::{self, AssertUnwindSafe};

use rpi_gpiomem::config::MemDevice;
use rpi_gpiomem::hal::mmio::{PhysicalMemory, RegisterBlock};
use rpi_gpiomem::hw::DevMem;
use rpi_gpiomem::{Config, Direction, Gpio, HardwareFamily, MapFailurePolicy, PinLevel};

fn word(bytes: &[u8], index: usize) -> u32 {
    let start = index * 4;
    u32::from_ne_bytes(bytes[start..start + 4].try_into().unwrap())
}

#[test]
fn gpiomem_window_starts_at_offset_zero() {
    let file = tempfile::NamedTempFile::new().unwrap();
    file.as_file().set_len(4096).unwrap();

    let config = Config::new(Some(HardwareFamily::Bcm2710))
        .with_device(MemDevice::GpioMem)
        .with_mem_device(file.path())
        .with_map_failure(MapFailurePolicy::Propagate);
    let mut gpio = Gpio::new(config);

    gpio.map().unwrap();
    gpio.set_direction(17, Direction::Output).unwrap();
    gpio.write_level(17, PinLevel::High).unwrap();
    assert_eq!(gpio.read_level(17).unwrap(), PinLevel::Low);
    gpio.unmap().unwrap();

    let bytes = fs::read(file.path()).unwrap();
    assert_eq!(bytes.len(), 4096);
    assert_eq!(word(&bytes, 1), 0b001 << 21);
    assert_eq!(word(&bytes, 7), 1 << 17);

    let mut memory = DevMem::new(file.path());
    let mut page = memory.map(0, 4096).unwrap();
    assert_eq!(page.read(7), 1 << 17);
    memory.unmap(&mut page).unwrap();
    memory.unmap(&mut page).unwrap();
    assert!(panic::catch_unwind(AssertUnwindSafe(|| page.read(7))).is_err());
}
