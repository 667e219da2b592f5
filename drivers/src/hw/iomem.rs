//! Peripheral base detection from the kernel's iomem listing.
//!
//! `/proc/iomem` lists physical ranges as `<start>-<end> : <label>`, one per
//! line, indented by nesting depth. The GPIO block appears with a label like
//! `gpio@7e200000`; its start minus [`GPIO_OFFSET`] is the peripheral base.
//! Non-root readers see every address as zero, which is treated the same as
//! a missing entry.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::platform::{GPIO_OFFSET, PeripheralBase};

/// Default location of the iomem listing.
pub const DEFAULT_IOMEM_PATH: &str = "/proc/iomem";

/// Start address of a `<hex>-<hex> : <label>` line whose label names the
/// GPIO block.
fn gpio_range_start(line: &str) -> Option<u32> {
    let (range, label) = line.split_once(':')?;
    if !label.contains("gpio@") {
        return None;
    }

    let (start, _end) = range.trim().split_once('-')?;
    u64::from_str_radix(start, 16)
        .ok()
        .and_then(|start| u32::try_from(start).ok())
}

/// Find the peripheral base in an iomem listing.
///
/// The first GPIO line with a usable nonzero start wins.
pub fn parse_base_address(iomem: &str) -> Option<PeripheralBase> {
    iomem
        .lines()
        .filter_map(gpio_range_start)
        .find(|&start| start != 0)
        .and_then(|start| start.checked_sub(GPIO_OFFSET))
        .and_then(PeripheralBase::new)
}

/// Read the listing at `path` and find the peripheral base.
///
/// An unreadable listing is reported the same as one without a GPIO entry.
pub fn probe_base_address(path: impl AsRef<Path>) -> Result<PeripheralBase> {
    let path = path.as_ref();
    let iomem = fs::read_to_string(path).map_err(|e| {
        debug!("can't read {}: {e}", path.display());
        Error::AddressNotFound
    })?;

    let base = parse_base_address(&iomem).ok_or(Error::AddressNotFound)?;
    info!("found peripheral base {base} in {}", path.display());
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI3_IOMEM: &str = "\
00000000-3b3fffff : System RAM
  00008000-00afffff : Kernel code
3f006000-3f006fff : dwc_otg
3f007000-3f007eff : dma@7e007000
3f200000-3f2000b3 : gpio@7e200000
3f201000-3f2011ff : serial@7e201000
";

    #[test]
    fn pi3_listing_yields_3f000000() {
        let base = parse_base_address(PI3_IOMEM).unwrap();
        assert_eq!(base.get(), 0x3f00_0000);
    }

    #[test]
    fn single_gpio_line() {
        let base = parse_base_address("3f200000-3f2000b3 : gpio@7e200000").unwrap();
        assert_eq!(base.get(), 0x3f00_0000);
    }

    #[test]
    fn indented_pi4_line() {
        let iomem = "fc000000-ffffffff : soc\n  fe200000-fe2000b3 : gpio@7e200000\n";
        assert_eq!(parse_base_address(iomem).unwrap().get(), 0xfe00_0000);
    }

    #[test]
    fn first_match_wins() {
        let iomem = "20200000-202000b3 : gpio@7e200000\n3f200000-3f2000b3 : gpio@7e200000\n";
        assert_eq!(parse_base_address(iomem).unwrap().get(), 0x2000_0000);
    }

    #[test]
    fn zeroed_listing_is_not_found() {
        let iomem = "00000000-00000000 : gpio@7e200000\n";
        assert!(parse_base_address(iomem).is_none());
    }

    #[test]
    fn no_gpio_line_is_not_found() {
        assert!(parse_base_address("3f201000-3f2011ff : serial@7e201000\n").is_none());
        assert!(parse_base_address("").is_none());
        assert!(parse_base_address("gpio@ with no range\n").is_none());
    }

    #[test]
    fn start_below_offset_is_not_found() {
        assert!(parse_base_address("00100000-001000b3 : gpio@7e200000").is_none());
    }

    #[test]
    fn unreadable_listing_is_address_not_found() {
        assert!(matches!(
            probe_base_address("/nonexistent/iomem"),
            Err(Error::AddressNotFound)
        ));
    }
}
