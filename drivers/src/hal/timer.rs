//! Timer Hardware Abstraction Layer.
//!
//! The pull-resistor protocol needs a blocking microsecond-scale delay
//! between register writes. Delays are not interruptible: a call always
//! sleeps for the full duration.

use std::time::Duration;

/// Blocking delay provider.
pub trait Delay {
    /// Block for at least `duration`.
    fn delay(&mut self, duration: Duration);

    /// Block for at least `us` microseconds.
    fn delay_us(&mut self, us: u64) {
        self.delay(Duration::from_micros(us));
    }
}

/// Delay backed by [`std::thread::sleep`].
#[derive(Debug, Default, Copy, Clone)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn std_delay_sleeps_at_least_requested() {
        let start = Instant::now();
        StdDelay.delay_us(500);
        assert!(start.elapsed() >= Duration::from_micros(500));
    }
}
