use std::cell::Cell;

/// We define various kinds of latches, which are all a primitive signaling
/// mechanism. A latch starts as false. Eventually someone calls `set()` and
/// it becomes true. You can test if it has been set by calling `is_set()`.
pub trait Latch {
    /// Set the latch, signalling others.
    fn set(&self);
    /// Test if the latch is set.
    fn is_set(&self) -> bool;
}

/// Counting latches join a number of completions. Unlike other latches,
/// calling `set()` does not necessarily make the latch be considered set;
/// instead, it just decrements the counter. The latch is only set once the
/// counter reaches zero.
///
/// Everything in the loading pipeline runs on a single cooperative thread, so
/// the counter is a plain `Cell`.
#[derive(Debug)]
pub struct CountLatch {
    counter: Cell<usize>,
}

impl CountLatch {
    #[inline]
    pub fn new(count: usize) -> CountLatch {
        CountLatch {
            counter: Cell::new(count),
        }
    }

    /// Registers one more completion to wait for.
    #[inline]
    pub fn increment(&self) {
        self.counter.set(self.counter.get() + 1);
    }

    /// Returns the number of completions still outstanding.
    #[inline]
    pub fn count(&self) -> usize {
        self.counter.get()
    }
}

impl Latch for CountLatch {
    #[inline]
    fn set(&self) {
        let v = self.counter.get();
        debug_assert!(v > 0, "count latch has been set more times than expected.");
        self.counter.set(v.saturating_sub(1));
    }

    #[inline]
    fn is_set(&self) -> bool {
        self.counter.get() == 0
    }
}
