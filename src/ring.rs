//! A fixed-capacity single-producer/single-consumer ring buffer of observed
//! durations, built to be pushed to from an interrupt handler and drained
//! from a main loop without a lock.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Default capacity used by [`crate::Collector`] when the caller doesn't
/// need a different one.
pub const DEFAULT_RING_CAPACITY: usize = 256;

#[allow(clippy::declare_interior_mutable_const)]
const ZERO_SLOT: AtomicU32 = AtomicU32::new(0);

/// A lock-free ring buffer of `u32` durations.
///
/// Safe to share as `&RingBuffer` between exactly one producer (calling
/// [`RingBuffer::push`], typically from an ISR) and exactly one consumer
/// (calling [`RingBuffer::pop`], typically from a main loop). `count` is the
/// single point of synchronization: the producer's `Release` store after
/// writing a slot happens-before the consumer's `Acquire` load that observes
/// it, so the consumer never reads a slot the producer hasn't finished
/// writing. [`RingBuffer::snapshot_last_n`] is read-only and may be called
/// from either side; it never mutates `read`/`write`/`count`.
pub struct RingBuffer<const CAP: usize> {
    storage: [AtomicU32; CAP],
    write: AtomicUsize,
    read: AtomicUsize,
    count: AtomicUsize,
}

impl<const CAP: usize> RingBuffer<CAP> {
    /// An empty ring buffer.
    pub const fn new() -> Self {
        Self {
            storage: [ZERO_SLOT; CAP],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            count: AtomicUsize::new(0),
        }
    }

    /// Pushes a duration. Returns `false` without writing anything if the
    /// buffer is full. Producer-only: never call this from more than one
    /// execution context at a time.
    pub fn push(&self, value: u32) -> bool {
        if self.count.load(Ordering::Acquire) >= CAP {
            return false;
        }
        let w = self.write.load(Ordering::Relaxed);
        self.storage[w].store(value, Ordering::Relaxed);
        let next = if w + 1 == CAP { 0 } else { w + 1 };
        self.write.store(next, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Release);
        true
    }

    /// Pops the oldest duration, if any. Consumer-only: never call this
    /// from more than one execution context at a time.
    pub fn pop(&self) -> Option<u32> {
        if self.count.load(Ordering::Acquire) == 0 {
            return None;
        }
        let r = self.read.load(Ordering::Relaxed);
        let value = self.storage[r].load(Ordering::Relaxed);
        let next = if r + 1 == CAP { 0 } else { r + 1 };
        self.read.store(next, Ordering::Relaxed);
        self.count.fetch_sub(1, Ordering::Release);
        Some(value)
    }

    /// Number of durations currently buffered.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// True if no durations are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The buffer's fixed capacity.
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Copies the `n` most recently pushed durations, oldest first, into
    /// `out`. Returns the number of durations written, which is
    /// `min(n, len(), out.len())`. Never mutates the buffer's read/write
    /// position, so it is safe to call alongside [`RingBuffer::pop`].
    pub fn snapshot_last_n(&self, n: usize, out: &mut [u32]) -> usize {
        let count = self.count.load(Ordering::Acquire).min(CAP);
        let take = n.min(count).min(out.len());
        let w = self.write.load(Ordering::Relaxed);
        let start = (w + CAP - take) % CAP;
        for (i, slot) in out.iter_mut().take(take).enumerate() {
            let idx = (start + i) % CAP;
            *slot = self.storage[idx].load(Ordering::Relaxed);
        }
        take
    }
}

impl<const CAP: usize> Default for RingBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_fifo() {
        let ring: RingBuffer<4> = RingBuffer::new();
        assert!(ring.push(10));
        assert!(ring.push(20));
        assert_eq!(ring.pop(), Some(10));
        assert_eq!(ring.pop(), Some(20));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn push_fails_when_full() {
        let ring: RingBuffer<2> = RingBuffer::new();
        assert!(ring.push(1));
        assert!(ring.push(2));
        assert!(!ring.push(3));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn snapshot_last_n_at_write_wrap_to_zero() {
        let ring: RingBuffer<4> = RingBuffer::new();
        for v in [1, 2, 3, 4] {
            ring.push(v);
        }
        // write index has wrapped back to 0.
        let mut out = [0u32; 4];
        assert_eq!(ring.snapshot_last_n(4, &mut out), 4);
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn snapshot_last_n_clamps_to_capacity_and_requested_count() {
        let ring: RingBuffer<4> = RingBuffer::new();
        ring.push(1);
        ring.push(2);
        ring.pop();
        ring.push(3);
        ring.push(4);
        // buffer holds [2, 3, 4]; asking for more than available or than CAP
        // clamps to what's actually there.
        let mut out = [0u32; 4];
        assert_eq!(ring.snapshot_last_n(4, &mut out), 3);
        assert_eq!(&out[..3], &[2, 3, 4]);

        let mut small = [0u32; 2];
        assert_eq!(ring.snapshot_last_n(10, &mut small), 2);
        assert_eq!(small, [3, 4]);
    }

    #[test]
    fn snapshot_last_n_is_read_only() {
        let ring: RingBuffer<4> = RingBuffer::new();
        ring.push(7);
        let mut out = [0u32; 1];
        ring.snapshot_last_n(1, &mut out);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.pop(), Some(7));
    }
}
