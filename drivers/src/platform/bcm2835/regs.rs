//! Register roles and the word-addressed view over a mapped GPIO window.
//!
//! Offsets are in 32-bit words from the start of the GPIO block, as laid
//! out in the BCM2835 ARM Peripherals documentation:
//!
//! | word  | register          |
//! |-------|-------------------|
//! | 0-5   | GPFSEL0-GPFSEL5   |
//! | 7     | GPSET0            |
//! | 10    | GPCLR0            |
//! | 13    | GPLEV0            |
//! | 37    | GPPUD             |
//! | 38    | GPPUDCLK0         |

use crate::error::{Error, Result};
use crate::hal::mmio::RegisterBlock;

/// Size of the mapped GPIO window in bytes (one page).
pub const BLOCK_SIZE: usize = 4096;

/// Size of the mapped GPIO window in words.
pub const BLOCK_WORDS: usize = BLOCK_SIZE / core::mem::size_of::<u32>();

/// Logical GPIO register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegisterRole {
    /// Function select bank `n` (GPFSELn), ten pins per bank.
    FunctionSelect(u8),
    /// Output set (GPSET0), write-only.
    Set,
    /// Output clear (GPCLR0), write-only.
    Clear,
    /// Pin level (GPLEV0), read-only.
    Level,
    /// Pull-up/down control (GPPUD).
    PullControl,
    /// Pull-up/down clock strobe (GPPUDCLK0).
    PullClock,
}

impl RegisterRole {
    /// Function select bank holding `pin`'s 3-bit field.
    pub const fn function_select(pin: u8) -> Self {
        RegisterRole::FunctionSelect(pin / 10)
    }

    /// Word offset of this register within the GPIO window.
    pub const fn offset(self) -> usize {
        match self {
            RegisterRole::FunctionSelect(bank) => bank as usize,
            RegisterRole::Set => 7,
            RegisterRole::Clear => 10,
            RegisterRole::Level => 13,
            RegisterRole::PullControl => 37,
            RegisterRole::PullClock => 38,
        }
    }
}

fn check_window<W: RegisterBlock>(window: &W) -> Result<()> {
    let words = window.word_count();
    if words < BLOCK_WORDS {
        return Err(Error::WindowTooSmall { words });
    }
    Ok(())
}

/// Role-addressed access to a live register window.
///
/// The window must span a full page. That is checked once at construction;
/// every role offset, including any `FunctionSelect` bank, is below
/// [`BLOCK_WORDS`], so accesses need no further bounds checks.
pub struct RegisterView<'a, W: RegisterBlock> {
    window: &'a mut W,
}

impl<'a, W: RegisterBlock> RegisterView<'a, W> {
    /// Wrap a mapped window.
    pub fn new(window: &'a mut W) -> Result<Self> {
        check_window(window)?;
        Ok(Self { window })
    }

    /// Read-only view over the same window.
    pub fn reader(&self) -> RegisterReader<'_, W> {
        RegisterReader { window: &*self.window }
    }

    /// Read the register for `role`.
    pub fn read(&self, role: RegisterRole) -> u32 {
        self.window.read(role.offset())
    }

    /// Write `value` to the register for `role`.
    pub fn write(&mut self, role: RegisterRole, value: u32) {
        self.window.write(role.offset(), value);
    }

    /// Read-modify-write the register for `role`.
    pub fn modify<F>(&mut self, role: RegisterRole, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        self.window.modify(role.offset(), f);
    }
}

/// Shared, read-only counterpart of [`RegisterView`].
pub struct RegisterReader<'a, W: RegisterBlock> {
    window: &'a W,
}

impl<'a, W: RegisterBlock> RegisterReader<'a, W> {
    /// Wrap a mapped window for reading.
    pub fn new(window: &'a W) -> Result<Self> {
        check_window(window)?;
        Ok(Self { window })
    }

    pub fn read(&self, role: RegisterRole) -> u32 {
        self.window.read(role.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Words(Vec<u32>);

    impl RegisterBlock for Words {
        fn word_count(&self) -> usize {
            self.0.len()
        }

        fn read(&self, index: usize) -> u32 {
            self.0[index]
        }

        fn write(&mut self, index: usize, value: u32) {
            self.0[index] = value;
        }
    }

    #[test]
    fn fixed_role_offsets() {
        assert_eq!(RegisterRole::Set.offset(), 7);
        assert_eq!(RegisterRole::Clear.offset(), 10);
        assert_eq!(RegisterRole::Level.offset(), 13);
        assert_eq!(RegisterRole::PullControl.offset(), 37);
        assert_eq!(RegisterRole::PullClock.offset(), 38);
    }

    #[test]
    fn function_select_bank_is_pin_div_ten() {
        assert_eq!(RegisterRole::function_select(0).offset(), 0);
        assert_eq!(RegisterRole::function_select(9).offset(), 0);
        assert_eq!(RegisterRole::function_select(17).offset(), 1);
        assert_eq!(RegisterRole::function_select(27).offset(), 2);
    }

    #[test]
    fn view_addresses_words_by_role() {
        let mut words = Words(vec![0; BLOCK_WORDS]);
        let mut view = RegisterView::new(&mut words).unwrap();
        view.write(RegisterRole::PullClock, 0xdead_beef);
        view.modify(RegisterRole::Level, |v| v | 1);
        assert_eq!(view.read(RegisterRole::PullClock), 0xdead_beef);
        assert_eq!(words.0[38], 0xdead_beef);
        assert_eq!(words.0[13], 1);
    }

    #[test]
    fn short_window_is_rejected() {
        let mut words = Words(vec![0; 16]);
        assert!(matches!(
            RegisterReader::new(&words),
            Err(Error::WindowTooSmall { words: 16 })
        ));
        assert!(matches!(
            RegisterView::new(&mut words),
            Err(Error::WindowTooSmall { words: 16 })
        ));
    }

    #[test]
    fn readers_share_the_window() {
        let mut words = Words(vec![0; BLOCK_WORDS]);
        words.0[13] = 0b1010;

        let first = RegisterReader::new(&words).unwrap();
        let second = RegisterReader::new(&words).unwrap();
        assert_eq!(first.read(RegisterRole::Level), second.read(RegisterRole::Level));
        assert_eq!(first.read(RegisterRole::Level), 0b1010);
    }
}
