use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the GPIO core.
///
/// Validation errors are raised before any register is touched. Resource
/// errors carry the underlying OS error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid hardware family {0} (expected 0-3)")]
    InvalidFamily(u8),
    #[error("unknown hardware family `{0}`")]
    UnknownFamilyName(String),
    #[error("no gpio block found in the iomem description")]
    AddressNotFound,
    #[error("invalid gpio pin {0} (expected 0-{max})", max = crate::MAX_PIN)]
    InvalidPin(u8),
    #[error("invalid level {0} (expected 0 or 1)")]
    InvalidLevel(u8),
    #[error("invalid pull mode {0} (expected 0, 1 or 2)")]
    InvalidMode(u8),
    #[error("invalid direction {0} (expected 0 or 1)")]
    InvalidDirection(u8),
    #[error("can't open `{}`: {source}", path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("mmap of {address:#010x} failed: {source}")]
    MapFailed {
        address: u64,
        #[source]
        source: io::Error,
    },
    #[error("munmap failed: {0}")]
    UnmapFailed(#[source] io::Error),
    #[error("register window is not mapped")]
    NotMapped,
    #[error("another register window is already live in this process")]
    WindowBusy,
    #[error("register window holds {words} words, too small for the gpio block")]
    WindowTooSmall { words: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
