//! Host-side backends for the HAL seams.
//!
//! - [`devmem`]: `/dev/mem` or `/dev/gpiomem` register window
//! - [`iomem`]: peripheral base detection from `/proc/iomem`
//! - [`mock`]: in-memory substitute that records every access

pub mod devmem;
pub mod iomem;
pub mod mock;

pub use devmem::{DevMem, MappedPage};
pub use mock::{Access, AccessLog, MockMemory, MockWindow, RecordingDelay};
