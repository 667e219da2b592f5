//! Direct /dev/mem and /dev/gpiomem access for the GPIO register window.
//!
//! Both devices are mapped the same way; only the file offset differs
//! (see [`MemDevice`](crate::config::MemDevice)). The device is opened read/write with `O_SYNC`, one page is mapped
//! `MAP_SHARED`, and the descriptor is closed as soon as `mmap` returns;
//! the mapping stays valid on its own. Only one window may be live per
//! process.

use std::fs::OpenOptions;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::ptr::{self, NonNull};

use common::sync::{ClaimGuard, ExclusiveClaim};
use log::{info, warn};

use crate::error::{Error, Result};
use crate::hal::mmio::{PhysicalMemory, RegisterBlock};

/// Default physical-memory device.
pub const DEFAULT_MEM_DEVICE: &str = "/dev/mem";

/// GPIO-only device exposed by the Raspberry Pi kernel.
pub const DEFAULT_GPIOMEM_DEVICE: &str = "/dev/gpiomem";

/// Held by whichever [`MappedPage`] is currently live.
static LIVE_WINDOW: ExclusiveClaim = ExclusiveClaim::new();

/// A physical-memory device node such as `/dev/mem` or `/dev/gpiomem`.
#[derive(Debug, Clone)]
pub struct DevMem {
    path: PathBuf,
}

impl DevMem {
    /// Use the device at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for DevMem {
    fn default() -> Self {
        Self::new(DEFAULT_MEM_DEVICE)
    }
}

impl PhysicalMemory for DevMem {
    type Window = MappedPage;

    fn map(&mut self, address: u64, len: usize) -> Result<MappedPage> {
        let claim = LIVE_WINDOW.try_claim().ok_or(Error::WindowBusy)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(&self.path)
            .map_err(|source| Error::DeviceOpen {
                path: self.path.clone(),
                source,
            })?;

        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                address as libc::off_t,
            )
        };
        // errno must be read before close() can overwrite it
        let mapped = if raw == libc::MAP_FAILED {
            Err(io::Error::last_os_error())
        } else {
            NonNull::new(raw.cast::<u32>()).ok_or_else(|| io::Error::other("mmap returned null"))
        };
        drop(file);

        let ptr = mapped.map_err(|source| Error::MapFailed { address, source })?;
        info!("mapped {len} bytes at {address:#010x} from {}", self.path.display());

        Ok(MappedPage {
            ptr: Some(ptr),
            len,
            address,
            claim: Some(claim),
        })
    }

    fn unmap(&mut self, window: &mut MappedPage) -> Result<()> {
        window.release().map_err(Error::UnmapFailed)
    }
}

/// A live `mmap` of the GPIO block.
///
/// Accesses are volatile 32-bit reads and writes. The page is released by
/// [`PhysicalMemory::unmap`] or, failing that, when dropped.
///
/// # Panics
///
/// Register access after a successful unmap panics instead of touching a
/// stale address.
#[derive(Debug)]
pub struct MappedPage {
    ptr: Option<NonNull<u32>>,
    len: usize,
    address: u64,
    claim: Option<ClaimGuard<'static>>,
}

// SAFETY: the page is device memory owned by this value alone; nothing
// else in the process holds the pointer.
unsafe impl Send for MappedPage {}

impl MappedPage {
    fn base(&self) -> *mut u32 {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => panic!("register window at {:#010x} used after munmap", self.address),
        }
    }

    /// Release the mapping. A page that is already released is left alone.
    fn release(&mut self) -> io::Result<()> {
        let Some(ptr) = self.ptr else {
            return Ok(());
        };

        if unsafe { libc::munmap(ptr.as_ptr().cast(), self.len) } != 0 {
            return Err(io::Error::last_os_error());
        }

        self.ptr = None;
        self.claim = None;
        info!("unmapped {:#010x}", self.address);
        Ok(())
    }
}

impl RegisterBlock for MappedPage {
    fn word_count(&self) -> usize {
        self.len / core::mem::size_of::<u32>()
    }

    fn read(&self, index: usize) -> u32 {
        debug_assert!(index < self.word_count());
        unsafe { ptr::read_volatile(self.base().add(index)) }
    }

    fn write(&mut self, index: usize, value: u32) {
        debug_assert!(index < self.word_count());
        unsafe { ptr::write_volatile(self.base().add(index), value) }
    }
}

impl Drop for MappedPage {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("failed to unmap {:#010x} on drop: {e}", self.address);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn missing_device_is_open_error_and_releases_the_claim() {
        let mut mem = DevMem::new("/nonexistent/mem");
        for _ in 0..2 {
            match mem.map(0x3f20_0000, 4096) {
                Err(Error::DeviceOpen { path, source }) => {
                    assert_eq!(path, Path::new("/nonexistent/mem"));
                    assert_eq!(source.kind(), io::ErrorKind::NotFound);
                }
                other => panic!("expected DeviceOpen, got {other:?}"),
            }
        }
        assert!(!LIVE_WINDOW.is_claimed());
    }
}
