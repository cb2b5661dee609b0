//! Software stand-ins for the hardware collaborators, used by unit tests.

use std::vec::Vec;

use crate::port::{ByteSink, TxInterrupt};

/// Records every write to the interrupt enable control.
#[derive(Debug, Default)]
pub struct MockIrq {
    pub enabled: bool,
    pub enables: usize,
    pub disables: usize,
}

impl MockIrq {
    pub const fn new() -> Self {
        MockIrq {
            enabled: false,
            enables: 0,
            disables: 0,
        }
    }
}

impl TxInterrupt for MockIrq {
    fn enable(&mut self) {
        self.enabled = true;
        self.enables += 1;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.disables += 1;
    }
}

/// Collects transmitted bytes; can be told to fail the next transmits.
#[derive(Debug, Default)]
pub struct VecSink {
    pub sent: Vec<u8>,
    /// Size of each `transmit` call, in order.
    pub calls: Vec<usize>,
    pub fail_next: usize,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SinkBusy;

impl ByteSink for VecSink {
    type Error = SinkBusy;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), SinkBusy> {
        self.calls.push(bytes.len());
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(SinkBusy);
        }
        self.sent.extend_from_slice(bytes);
        Ok(())
    }
}

/// A [`VecSink`] whose hardware accepts only 3 bytes per call.
#[derive(Debug, Default)]
pub struct NarrowSink {
    pub inner: VecSink,
}

impl ByteSink for NarrowSink {
    type Error = SinkBusy;
    const MAX_TRANSFER: usize = 3;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), SinkBusy> {
        self.inner.transmit(bytes)
    }
}

/// `0, 1, 2, ...` wrapping at 256.
pub fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}
