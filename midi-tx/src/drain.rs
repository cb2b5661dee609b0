//! Interrupt-side drain path.
//!
//! Each transmit interrupt runs two steps:
//!
//! 1. [`take_chunk()`] — inside the session's critical section: if the
//!    buffer is empty, disarm the gate and stop; otherwise dequeue up to one
//!    chunk. The gate is left armed so the next interrupt drains again.
//! 2. [`deliver()`] — outside the critical section: hand the chunk to the
//!    [`ByteSink`] in a single call.
//!
//! The interrupt context never re-enters itself, so splitting the two steps
//! cannot reorder bytes.
//!
//! ```text
//!  TransferBuffer ──take_chunk──► Chunk ──deliver──► ByteSink::transmit
//!        │ empty
//!        └──────► InterruptGate::disarm
//! ```

use core::ops::Deref;

use log::{trace, warn};

use crate::buffer::TransferBuffer;
use crate::constants::MAX_CHUNK;
use crate::gate::InterruptGate;
use crate::port::{ByteSink, TxInterrupt};

/// Result of one interrupt's worth of draining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// `n` bytes handed to the sink. The gate stays armed.
    Sent(usize),
    /// The sink rejected a chunk of `n` bytes; they are lost.
    SinkFailed(usize),
    /// The buffer was empty; the gate is now disarmed.
    Idle,
}

/// Up to [`MAX_CHUNK`] bytes removed from the buffer for one transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    bytes: [u8; MAX_CHUNK],
    len: usize,
}

impl Deref for Chunk {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Per-interrupt byte bound for sink `S`: its own limit, capped at
/// [`MAX_CHUNK`] and never below one byte.
pub fn chunk_limit<S: ByteSink>() -> usize {
    S::MAX_TRANSFER.clamp(1, MAX_CHUNK)
}

/// Dequeue the next chunk, or disarm the gate if there is nothing to send.
///
/// Must run with the buffer and gate locked together.
pub fn take_chunk<I: TxInterrupt, const N: usize>(
    buffer: &mut TransferBuffer<N>,
    gate: &mut InterruptGate<I>,
    limit: usize,
) -> Option<Chunk> {
    if buffer.is_empty() {
        gate.disarm();
        return None;
    }

    let mut chunk = Chunk {
        bytes: [0; MAX_CHUNK],
        len: 0,
    };
    let limit = limit.clamp(1, MAX_CHUNK);
    chunk.len = buffer.dequeue(&mut chunk.bytes[..limit]);
    Some(chunk)
}

/// Hand a chunk to the sink. A failed transmit is logged and counted as lost.
pub fn deliver<S: ByteSink>(sink: &mut S, chunk: &Chunk) -> DrainOutcome {
    match sink.transmit(chunk) {
        Ok(()) => {
            trace!("transmitted {} bytes", chunk.len());
            DrainOutcome::Sent(chunk.len())
        }
        Err(err) => {
            warn!("transmit failed, {} bytes lost: {:?}", chunk.len(), err);
            DrainOutcome::SinkFailed(chunk.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockIrq, NarrowSink, VecSink};

    fn armed_gate() -> InterruptGate<MockIrq> {
        let mut gate = InterruptGate::new(MockIrq::new());
        gate.arm();
        gate
    }

    #[test]
    fn empty_buffer_disarms() {
        let mut buffer: TransferBuffer<16> = TransferBuffer::new();
        let mut gate = armed_gate();

        assert!(take_chunk(&mut buffer, &mut gate, MAX_CHUNK).is_none());
        assert!(!gate.is_armed());
        assert!(!gate.irq().enabled);
    }

    #[test]
    fn chunk_is_bounded_and_gate_stays_armed() {
        let mut buffer: TransferBuffer<16> = TransferBuffer::new();
        buffer.enqueue(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], usize::MAX);
        let mut gate = armed_gate();

        let chunk = take_chunk(&mut buffer, &mut gate, MAX_CHUNK).unwrap();
        assert_eq!(&chunk[..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buffer.len(), 2);
        assert!(gate.is_armed());
        assert_eq!(gate.irq().disables, 0);

        let chunk = take_chunk(&mut buffer, &mut gate, MAX_CHUNK).unwrap();
        assert_eq!(&chunk[..], &[9, 10]);
        assert!(gate.is_armed());

        assert!(take_chunk(&mut buffer, &mut gate, MAX_CHUNK).is_none());
        assert!(!gate.is_armed());
    }

    #[test]
    fn oversized_limit_is_capped() {
        let mut buffer: TransferBuffer<32> = TransferBuffer::new();
        buffer.enqueue(&[0xF8; 20], usize::MAX);
        let mut gate = armed_gate();

        let chunk = take_chunk(&mut buffer, &mut gate, 1000).unwrap();
        assert_eq!(chunk.len(), MAX_CHUNK);
    }

    #[test]
    fn chunk_limit_follows_sink() {
        assert_eq!(chunk_limit::<VecSink>(), MAX_CHUNK);
        assert_eq!(chunk_limit::<NarrowSink>(), 3);
    }

    #[test]
    fn deliver_reports_sent() {
        let mut buffer: TransferBuffer<16> = TransferBuffer::new();
        buffer.enqueue(&[0x90, 60, 100], usize::MAX);
        let mut gate = armed_gate();
        let mut sink = VecSink::new();

        let chunk = take_chunk(&mut buffer, &mut gate, MAX_CHUNK).unwrap();
        assert_eq!(deliver(&mut sink, &chunk), DrainOutcome::Sent(3));
        assert_eq!(sink.sent, [0x90, 60, 100]);
        assert_eq!(sink.calls, [3]);
    }

    #[test]
    fn deliver_failure_loses_chunk() {
        let mut buffer: TransferBuffer<16> = TransferBuffer::new();
        buffer.enqueue(&[1, 2, 3, 4], usize::MAX);
        let mut gate = armed_gate();
        let mut sink = VecSink::new();
        sink.fail_next = 1;

        let chunk = take_chunk(&mut buffer, &mut gate, 2).unwrap();
        assert_eq!(deliver(&mut sink, &chunk), DrainOutcome::SinkFailed(2));

        // Not retried: the next chunk continues after the lost bytes
        let chunk = take_chunk(&mut buffer, &mut gate, 2).unwrap();
        assert_eq!(deliver(&mut sink, &chunk), DrainOutcome::Sent(2));
        assert_eq!(sink.sent, [3, 4]);
    }
}
