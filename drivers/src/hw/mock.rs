//! In-memory substitute for the physical-memory device.
//!
//! [`MockMemory`] hands out windows over a shared word array and appends
//! every map, unmap, register access and delay to an [`AccessLog`], so a
//! caller can check exactly which registers were touched and in what order.
//! The GPSET0/GPCLR0 registers drive GPLEV0 the way an output pin would;
//! they read back as zero like the write-only hardware registers.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::hal::mmio::{PhysicalMemory, RegisterBlock};
use crate::hal::timer::Delay;
use crate::platform::bcm2835::{BLOCK_WORDS, RegisterRole};

/// One observable event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Map { address: u64, len: usize },
    Unmap { address: u64 },
    Read { word: usize, value: u32 },
    Write { word: usize, value: u32 },
    Delay(Duration),
}

/// Shared, ordered record of [`Access`] events.
#[derive(Debug, Clone, Default)]
pub struct AccessLog(Rc<RefCell<Vec<Access>>>);

impl AccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, access: Access) {
        self.0.borrow_mut().push(access);
    }

    /// Copy of every event so far.
    pub fn events(&self) -> Vec<Access> {
        self.0.borrow().clone()
    }

    /// `(word, value)` of every register write so far.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|access| match *access {
                Access::Write { word, value } => Some((word, value)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Substitute physical-memory device.
#[derive(Debug)]
pub struct MockMemory {
    log: AccessLog,
    words: Rc<RefCell<Vec<u32>>>,
    fail_next_map: bool,
    failing_unmaps: usize,
}

impl MockMemory {
    pub fn new(log: AccessLog) -> Self {
        Self {
            log,
            words: Rc::new(RefCell::new(vec![0; BLOCK_WORDS])),
            fail_next_map: false,
            failing_unmaps: 0,
        }
    }

    /// Make the next [`map`](PhysicalMemory::map) fail with `MapFailed`.
    pub fn fail_next_map(&mut self) {
        self.fail_next_map = true;
    }

    /// Make the next `count` unmaps fail with `UnmapFailed`.
    pub fn fail_next_unmaps(&mut self, count: usize) {
        self.failing_unmaps = count;
    }

    /// Register contents without logging an access.
    pub fn peek(&self, word: usize) -> u32 {
        self.words.borrow()[word]
    }

    /// Overwrite a register without logging, e.g. to drive an input level.
    pub fn poke(&self, word: usize, value: u32) {
        self.words.borrow_mut()[word] = value;
    }
}

impl PhysicalMemory for MockMemory {
    type Window = MockWindow;

    fn map(&mut self, address: u64, len: usize) -> Result<MockWindow> {
        self.log.push(Access::Map { address, len });
        if std::mem::take(&mut self.fail_next_map) {
            return Err(Error::MapFailed {
                address,
                source: io::Error::from_raw_os_error(libc::EPERM),
            });
        }

        Ok(MockWindow {
            log: self.log.clone(),
            words: Rc::clone(&self.words),
            address,
            mapped: true,
        })
    }

    fn unmap(&mut self, window: &mut MockWindow) -> Result<()> {
        if !window.mapped {
            return Ok(());
        }
        if self.failing_unmaps > 0 {
            self.failing_unmaps -= 1;
            return Err(Error::UnmapFailed(io::Error::from_raw_os_error(libc::EINVAL)));
        }

        self.log.push(Access::Unmap {
            address: window.address,
        });
        window.mapped = false;
        Ok(())
    }
}

/// Window handed out by [`MockMemory`].
#[derive(Debug)]
pub struct MockWindow {
    log: AccessLog,
    words: Rc<RefCell<Vec<u32>>>,
    address: u64,
    mapped: bool,
}

const SET: usize = RegisterRole::Set.offset();
const CLEAR: usize = RegisterRole::Clear.offset();
const LEVEL: usize = RegisterRole::Level.offset();

impl RegisterBlock for MockWindow {
    fn word_count(&self) -> usize {
        BLOCK_WORDS
    }

    fn read(&self, index: usize) -> u32 {
        assert!(self.mapped, "read from unmapped mock window");
        let value = match index {
            SET | CLEAR => 0,
            _ => self.words.borrow()[index],
        };
        self.log.push(Access::Read { word: index, value });
        value
    }

    fn write(&mut self, index: usize, value: u32) {
        assert!(self.mapped, "write to unmapped mock window");
        self.log.push(Access::Write { word: index, value });

        let mut words = self.words.borrow_mut();
        match index {
            SET => words[LEVEL] |= value,
            CLEAR => words[LEVEL] &= !value,
            LEVEL => {}
            _ => words[index] = value,
        }
    }
}

/// Delay that records the requested duration instead of sleeping.
#[derive(Debug, Clone)]
pub struct RecordingDelay {
    log: AccessLog,
}

impl RecordingDelay {
    pub fn new(log: AccessLog) -> Self {
        Self { log }
    }
}

impl Delay for RecordingDelay {
    fn delay(&mut self, duration: Duration) {
        self.log.push(Access::Delay(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "read from unmapped mock window")]
    fn access_after_unmap_panics() {
        let mut memory = MockMemory::new(AccessLog::new());
        let mut window = memory.map(0x3f20_0000, 4096).unwrap();
        memory.unmap(&mut window).unwrap();
        memory.unmap(&mut window).unwrap();
        window.read(RegisterRole::Level.offset());
    }
}
