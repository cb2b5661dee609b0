//! Producer-side submission path.
//!
//! [`submit()`] runs whenever the producer has new bytes or wants to resume
//! transmission. It takes as many offered bytes as fit in the buffer's free
//! space, reports the rest as dropped, and arms the interrupt gate so the
//! drain path picks the new bytes up.
//!
//! The whole routine runs inside the session's critical section: the free
//! space it measures is still free when it enqueues, and the arm it issues
//! cannot be undone by a drain that saw the buffer empty a moment earlier.

use log::error;

use crate::buffer::TransferBuffer;
use crate::gate::InterruptGate;
use crate::port::{SubmissionSource, TxInterrupt};

/// What happened to the bytes offered by one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Bytes moved into the transfer buffer.
    pub queued: usize,
    /// Bytes the buffer could not take. They are permanently lost.
    pub dropped: usize,
}

impl SubmitReport {
    /// Whether any offered byte was lost.
    pub fn is_dropout(&self) -> bool {
        self.dropped > 0
    }
}

/// Move offered bytes from `source` into `buffer`.
///
/// - Buffer full: everything offered is discarded and reported as dropped;
///   the source is never asked to provide, and buffer and gate are not
///   touched.
/// - Otherwise the source writes straight into the free space until it is
///   full or the source has nothing more to give. Only when the source
///   offered more than the free space is the rest discarded and reported.
/// - The gate is armed if at least one byte was queued.
/// - A source offering nothing is a no-op.
pub fn submit<I, S, const N: usize>(
    buffer: &mut TransferBuffer<N>,
    gate: &mut InterruptGate<I>,
    source: &mut S,
) -> SubmitReport
where
    I: TxInterrupt,
    S: SubmissionSource + ?Sized,
{
    let avail = buffer.free_capacity();

    if avail == 0 {
        let dropped = source.discard();
        error!("dropout! {} bytes dropped", dropped);
        return SubmitReport { queued: 0, dropped };
    }

    let offered = source.available();
    let queued = buffer.enqueue_with(|free| source.provide(free));

    let dropped = if offered > avail { source.discard() } else { 0 };
    if dropped > 0 {
        error!("{} bytes lost", dropped);
    }

    if queued > 0 {
        gate.arm();
    }

    SubmitReport { queued, dropped }
}
