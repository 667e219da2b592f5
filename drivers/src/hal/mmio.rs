//! Memory-Mapped I/O Hardware Abstraction Layer.
//!
//! A [`RegisterBlock`] is a window of 32-bit registers addressed by word
//! index. A [`PhysicalMemory`] device produces and releases such windows.
//! The Linux `/dev/mem` backend lives in [`crate::hw::devmem`]; an in-memory
//! substitute lives in [`crate::hw::mock`].

use crate::error::Result;

/// A mapped window of 32-bit registers.
///
/// Every access is a single volatile word access; implementations must not
/// cache, merge or reorder them.
pub trait RegisterBlock {
    /// Number of addressable words in the window.
    fn word_count(&self) -> usize;

    /// Read the word at `index`.
    ///
    /// `index` is always below [`word_count`](Self::word_count).
    fn read(&self, index: usize) -> u32;

    /// Write `value` to the word at `index`.
    fn write(&mut self, index: usize, value: u32);

    /// Read-modify-write the word at `index`.
    fn modify<F>(&mut self, index: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(index);
        self.write(index, f(value));
    }
}

/// A device that can map physical memory into the process.
pub trait PhysicalMemory {
    /// The window type produced by [`map`](Self::map).
    type Window: RegisterBlock;

    /// Map `len` bytes of physical memory starting at `address`.
    fn map(&mut self, address: u64, len: usize) -> Result<Self::Window>;

    /// Release a window produced by [`map`](Self::map).
    ///
    /// On failure the window is still mapped and the call may be retried.
    /// After success the window must not be read or written again; backends
    /// panic on such an access. Releasing an already released window is a
    /// no-op.
    fn unmap(&mut self, window: &mut Self::Window) -> Result<()>;
}
