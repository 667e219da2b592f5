use core::sync::atomic::{AtomicBool, Ordering};

/// A single-owner token for a process-wide resource.
///
/// `ExclusiveClaim` is the non-blocking sibling of a spinlock: instead of
/// busy-waiting until the flag clears, [`try_claim`](Self::try_claim) fails
/// immediately when another owner holds the claim. It guards resources where
/// a second concurrent owner is an error rather than something to wait for,
/// such as a mapped hardware register window.
///
/// The claim protects no data of its own; the guard only records ownership.
#[derive(Debug)]
pub struct ExclusiveClaim {
    claimed: AtomicBool,
}

impl ExclusiveClaim {
    /// Creates an unclaimed token.
    ///
    /// # Example
    ///
    /// ```
    /// use common::sync::ExclusiveClaim;
    ///
    /// static WINDOW: ExclusiveClaim = ExclusiveClaim::new();
    /// let guard = WINDOW.try_claim().unwrap();
    /// assert!(WINDOW.try_claim().is_none());
    /// drop(guard);
    /// assert!(WINDOW.try_claim().is_some());
    /// ```
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    /// Attempts to take ownership.
    ///
    /// Returns `None` if the claim is already held.
    pub fn try_claim(&self) -> Option<ClaimGuard<'_>> {
        self.claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| ClaimGuard { claim: self })
    }

    /// Returns `true` while some guard is alive.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

impl Default for ExclusiveClaim {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of ownership returned by [`ExclusiveClaim::try_claim`].
///
/// The claim is released when the guard is dropped.
#[derive(Debug)]
pub struct ClaimGuard<'a> {
    claim: &'a ExclusiveClaim,
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        self.claim.claimed.store(false, Ordering::Release);
    }
}
