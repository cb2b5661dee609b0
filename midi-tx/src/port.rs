//! Collaborator contracts at the edges of the transmit path.
//!
//! | Trait | Called from | Role |
//! |-------|-------------|------|
//! | [`SubmissionSource`] | producer context | Offers bytes waiting to be sent |
//! | [`ByteSink`] | interrupt context | Physically transmits bytes |
//! | [`TxInterrupt`] | both (inside the critical section) | Transmit-interrupt enable control |

use core::fmt::Debug;

use crate::constants::MAX_CHUNK;

/// The physical transmitter.
///
/// Only ever invoked from the interrupt/consumer context, once per interrupt,
/// with at most [`MAX_TRANSFER`](Self::MAX_TRANSFER) bytes.
pub trait ByteSink {
    /// Error reported by a failed transmit.
    type Error: Debug;

    /// Most bytes this sink accepts per call (e.g. hardware TX FIFO depth).
    ///
    /// The drain path caps this at [`MAX_CHUNK`].
    const MAX_TRANSFER: usize = MAX_CHUNK;

    /// Transmit `bytes` in order. Must not block.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Producer-side bytes offered for transmission.
pub trait SubmissionSource {
    /// Number of bytes currently offered.
    fn available(&self) -> usize;

    /// Move up to `buf.len()` offered bytes into `buf`, oldest first.
    ///
    /// Returns how many bytes were written. Never more than `buf.len()`;
    /// fewer (including zero) is allowed.
    fn provide(&mut self, buf: &mut [u8]) -> usize;

    /// Drop every byte still offered and return how many were dropped.
    ///
    /// A source that keeps its backlog for a later submission (e.g. an
    /// upstream ring buffer) returns 0 and keeps the bytes.
    fn discard(&mut self) -> usize;
}

/// Hardware transmit-interrupt enable control.
pub trait TxInterrupt {
    /// Enable the transmit interrupt. Called even when already enabled.
    fn enable(&mut self);

    /// Disable the transmit interrupt. Called even when already disabled.
    fn disable(&mut self);
}

/// A [`SubmissionSource`] reading from a borrowed byte slice.
///
/// ```ignore
/// let mut note_on = SliceSource::new(&[0x90, 60, 100]);
/// session.on_submission_ready(&mut note_on)?;
/// assert!(note_on.is_exhausted());
/// ```
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        SliceSource { data, pos: 0 }
    }

    /// The bytes not yet provided or discarded.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}

impl SubmissionSource for SliceSource<'_> {
    fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    fn provide(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.available());
        buf[..count].copy_from_slice(&self.data[self.pos..self.pos + count]);
        self.pos += count;
        count
    }

    fn discard(&mut self) -> usize {
        let dropped = self.available();
        self.pos = self.data.len();
        dropped
    }
}
