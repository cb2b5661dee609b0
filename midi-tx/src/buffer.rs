//! Fixed-capacity byte FIFO between the producer and the transmit interrupt.
//!
//! [`TransferBuffer`] is a plain ring buffer with no internal
//! synchronization. It is always accessed through the session's critical
//! section, together with the [`InterruptGate`](crate::gate::InterruptGate),
//! so occupancy checks and the enqueue/dequeue that follow them form a
//! single unit relative to the other context.
//!
//! # Invariants
//!
//! - `len() <= capacity()` at all times.
//! - [`enqueue()`](TransferBuffer::enqueue) never blocks: it accepts at most
//!   `free_capacity()` bytes and reports how many it took.
//! - Bytes leave in the order they entered.

use crate::constants::FIFO_SIZE;

/// A fixed-capacity byte queue with FIFO semantics.
///
/// # Type Parameters
///
/// - `N`: Capacity in bytes. Every slot is usable (occupancy is tracked with
///   an explicit count rather than a sentinel slot). Must be ≥ 1.
pub struct TransferBuffer<const N: usize = FIFO_SIZE> {
    storage: [u8; N],
    /// Index of the oldest queued byte.
    head: usize,
    /// Number of queued bytes.
    len: usize,
}

impl<const N: usize> TransferBuffer<N> {
    /// Create a new empty buffer.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 1.
    pub const fn new() -> Self {
        assert!(N >= 1, "transfer buffer must hold at least one byte");

        TransferBuffer {
            storage: [0; N],
            head: 0,
            len: 0,
        }
    }

    /// Discard all queued bytes.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Total capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes currently queued.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Number of bytes that can still be enqueued.
    pub fn free_capacity(&self) -> usize {
        N - self.len
    }

    /// Append the first `min(bytes.len(), max, free_capacity())` bytes.
    ///
    /// Returns how many bytes were accepted. Accepting zero bytes (buffer
    /// full, empty input, or `max == 0`) is a normal outcome.
    pub fn enqueue(&mut self, bytes: &[u8], max: usize) -> usize {
        let count = bytes.len().min(max).min(self.free_capacity());
        if count == 0 {
            return 0;
        }

        let tail = (self.head + self.len) % N;
        // First run: from tail up to the end of storage.
        let first = count.min(N - tail);
        self.storage[tail..tail + first].copy_from_slice(&bytes[..first]);
        // Second run wraps to the start.
        let second = count - first;
        self.storage[..second].copy_from_slice(&bytes[first..count]);

        self.len += count;
        count
    }

    /// Let `fill` write straight into the free space.
    ///
    /// `fill` is handed one contiguous free run at a time (at most two per
    /// pass over the ring) and returns how many bytes it wrote. Calls stop
    /// once the buffer is full or `fill` writes nothing. Returns the total
    /// number of bytes appended.
    pub fn enqueue_with<F>(&mut self, mut fill: F) -> usize
    where
        F: FnMut(&mut [u8]) -> usize,
    {
        let mut total = 0;
        while !self.is_full() {
            let tail = (self.head + self.len) % N;
            let run = (N - tail).min(self.free_capacity());
            let written = fill(&mut self.storage[tail..tail + run]).min(run);
            if written == 0 {
                break;
            }
            self.len += written;
            total += written;
        }
        total
    }

    /// Remove up to `out.len()` bytes from the front into `out`.
    ///
    /// Returns how many bytes were written to `out`, which is fewer than
    /// requested when the buffer holds less.
    pub fn dequeue(&mut self, out: &mut [u8]) -> usize {
        let count = out.len().min(self.len);
        if count == 0 {
            return 0;
        }

        let first = count.min(N - self.head);
        out[..first].copy_from_slice(&self.storage[self.head..self.head + first]);
        let second = count - first;
        out[first..count].copy_from_slice(&self.storage[..second]);

        self.head = (self.head + count) % N;
        self.len -= count;
        count
    }
}

impl<const N: usize> Default for TransferBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
