//! Cumulative per-session transfer counters.

use crate::drain::DrainOutcome;
use crate::trigger::SubmitReport;

/// Running totals since the session was last opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Bytes accepted into the transfer buffer.
    pub submitted: u64,
    /// Bytes offered but lost to a full buffer.
    pub dropped: u64,
    /// Submissions that found the buffer completely full.
    pub dropouts: u32,
    /// Bytes handed to the sink successfully.
    pub transmitted: u64,
    /// Transmit calls the sink rejected.
    pub sink_failures: u32,
    /// Bytes in the chunks the sink rejected.
    pub sink_lost: u64,
    /// Bytes still queued when the session was closed.
    pub lost_on_close: u64,
}

impl SessionStats {
    pub const fn new() -> Self {
        SessionStats {
            submitted: 0,
            dropped: 0,
            dropouts: 0,
            transmitted: 0,
            sink_failures: 0,
            sink_lost: 0,
            lost_on_close: 0,
        }
    }

    pub(crate) fn record_submit(&mut self, report: &SubmitReport, was_full: bool) {
        self.submitted += report.queued as u64;
        self.dropped += report.dropped as u64;
        if was_full {
            self.dropouts += 1;
        }
    }

    pub(crate) fn record_drain(&mut self, outcome: DrainOutcome) {
        match outcome {
            DrainOutcome::Sent(n) => self.transmitted += n as u64,
            DrainOutcome::SinkFailed(n) => {
                self.sink_failures += 1;
                self.sink_lost += n as u64;
            }
            DrainOutcome::Idle => {}
        }
    }

    /// Bytes that never reached the sink, for any reason.
    pub fn bytes_lost(&self) -> u64 {
        self.dropped + self.sink_lost + self.lost_on_close
    }
}
