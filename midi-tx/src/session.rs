//! Output session: the host-facing surface of the transmit path.
//!
//! A [`Session`] owns one [`TransferBuffer`] and one [`InterruptGate`] and
//! exposes exactly four entry points:
//!
//! | Entry point | Context | Maps to |
//! |-------------|---------|---------|
//! | [`open()`](Session::open) | producer | reset buffer, disarm gate |
//! | [`close()`](Session::close) | producer | discard queue, disarm gate |
//! | [`on_submission_ready()`](Session::on_submission_ready) | producer | [`trigger::submit`] |
//! | [`on_interrupt()`](Session::on_interrupt) | interrupt | [`drain::take_chunk`] + [`drain::deliver`] |
//!
//! All shared state sits behind a single `critical_section::Mutex`, so the
//! buffer and the gate always change together: a submission's capacity
//! check, enqueue and arm cannot interleave with a drain's dequeue and
//! disarm.
//!
//! ## Usage
//!
//! ```ignore
//! static MIDI_OUT: Session<UartTxIrq> = Session::new(UartTxIrq);
//!
//! // Producer:
//! MIDI_OUT.open();
//! let report = MIDI_OUT.on_submission_ready(&mut SliceSource::new(&[0x90, 60, 100]))?;
//! if report.is_dropout() { /* resend or give up */ }
//!
//! // Transmit-interrupt handler:
//! let _ = MIDI_OUT.on_interrupt(&mut uart_tx);
//! ```
//!
//! ## Closing
//!
//! [`close()`](Session::close) does not flush: bytes still queued are
//! discarded without being transmitted, and the count is returned.

use core::cell::RefCell;

use critical_section::Mutex;
use log::{debug, warn};

use crate::buffer::TransferBuffer;
use crate::constants::FIFO_SIZE;
use crate::drain::{self, DrainOutcome};
use crate::error::SessionError;
use crate::gate::InterruptGate;
use crate::port::{ByteSink, SubmissionSource, TxInterrupt};
use crate::stats::SessionStats;
use crate::trigger::{self, SubmitReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
}

/// Everything both contexts touch, locked as one unit.
struct Shared<I, const N: usize> {
    state: State,
    /// Bumped by every open/close so in-flight chunks can be attributed.
    generation: u32,
    buffer: TransferBuffer<N>,
    gate: InterruptGate<I>,
    stats: SessionStats,
}

/// One output session over a transmit interrupt `I` with an `N` byte buffer.
///
/// Starts closed. Can be placed in a `static` since [`new()`](Self::new)
/// is `const`.
pub struct Session<I, const N: usize = FIFO_SIZE> {
    shared: Mutex<RefCell<Shared<I, N>>>,
}

impl<I: TxInterrupt, const N: usize> Session<I, N> {
    /// Create a closed session. The interrupt control is not touched until
    /// [`open()`](Self::open).
    pub const fn new(irq: I) -> Self {
        Session {
            shared: Mutex::new(RefCell::new(Shared {
                state: State::Closed,
                generation: 0,
                buffer: TransferBuffer::new(),
                gate: InterruptGate::new(irq),
                stats: SessionStats::new(),
            })),
        }
    }

    /// Start (or restart) the session.
    ///
    /// Always leaves the buffer empty, the gate disarmed and the statistics
    /// zeroed, whatever state the session was in.
    pub fn open(&self) {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.buffer.reset();
            shared.gate.disarm();
            shared.stats = SessionStats::new();
            shared.state = State::Open;
            shared.generation = shared.generation.wrapping_add(1);
        });
        debug!("output session opened ({} byte buffer)", N);
    }

    /// End the session without flushing.
    ///
    /// Queued bytes are discarded and their count returned; the gate is
    /// disarmed so no further interrupts arrive. Closing a closed session
    /// returns 0.
    pub fn close(&self) -> usize {
        let discarded = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            if shared.state == State::Closed {
                return 0;
            }
            let discarded = shared.buffer.len();
            shared.buffer.reset();
            shared.gate.disarm();
            shared.stats.lost_on_close += discarded as u64;
            shared.state = State::Closed;
            shared.generation = shared.generation.wrapping_add(1);
            discarded
        });
        if discarded > 0 {
            debug!("output session closed, {} queued bytes discarded", discarded);
        } else {
            debug!("output session closed");
        }
        discarded
    }

    /// Producer entry point: pull offered bytes from `source` into the buffer.
    ///
    /// Never blocks. Lost bytes are reported in the returned
    /// [`SubmitReport`], not as an error.
    pub fn on_submission_ready<S>(&self, source: &mut S) -> Result<SubmitReport, SessionError>
    where
        S: SubmissionSource + ?Sized,
    {
        critical_section::with(|cs| {
            let mut guard = self.shared.borrow_ref_mut(cs);
            let shared = &mut *guard;
            if shared.state != State::Open {
                return Err(SessionError::NotOpen);
            }
            let was_full = shared.buffer.is_full();
            let report = trigger::submit(&mut shared.buffer, &mut shared.gate, source);
            shared.stats.record_submit(&report, was_full);
            Ok(report)
        })
        .inspect_err(|err| warn!("submission rejected: {}", err))
    }

    /// Interrupt entry point: send the next chunk to `sink`, or disarm the
    /// gate when nothing is queued.
    ///
    /// Does a bounded amount of work per call. A stray interrupt on a closed
    /// session disarms the gate and reports [`SessionError::NotOpen`].
    ///
    /// If the session is closed or reopened while the chunk is with the
    /// sink, the outcome is still returned but not added to the new
    /// session's [`stats()`](Self::stats).
    pub fn on_interrupt<S: ByteSink>(&self, sink: &mut S) -> Result<DrainOutcome, SessionError> {
        let limit = drain::chunk_limit::<S>();
        let taken = critical_section::with(|cs| {
            let mut guard = self.shared.borrow_ref_mut(cs);
            let shared = &mut *guard;
            if shared.state != State::Open {
                shared.gate.disarm();
                return Err(SessionError::NotOpen);
            }
            let chunk = drain::take_chunk(&mut shared.buffer, &mut shared.gate, limit);
            Ok(chunk.map(|chunk| (chunk, shared.generation)))
        });

        let (chunk, generation) = match taken {
            Ok(Some(taken)) => taken,
            Ok(None) => return Ok(DrainOutcome::Idle),
            Err(err) => {
                warn!("interrupt ignored: {}", err);
                return Err(err);
            }
        };

        let outcome = drain::deliver(sink, &chunk);
        // A chunk taken before a close/open belongs to the old session's
        // counters, which are gone.
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            if shared.generation == generation {
                shared.stats.record_drain(outcome);
            }
        });
        Ok(outcome)
    }

    pub fn is_open(&self) -> bool {
        self.read(|shared| shared.state == State::Open)
    }

    /// Whether the transmit interrupt is currently armed.
    pub fn is_armed(&self) -> bool {
        self.read(|shared| shared.gate.is_armed())
    }

    /// Bytes waiting in the transfer buffer.
    pub fn queued(&self) -> usize {
        self.read(|shared| shared.buffer.len())
    }

    pub fn free_capacity(&self) -> usize {
        self.read(|shared| shared.buffer.free_capacity())
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Snapshot of the counters since the last [`open()`](Self::open).
    pub fn stats(&self) -> SessionStats {
        self.read(|shared| shared.stats)
    }

    /// Inspect the interrupt enable control.
    pub fn with_irq<R>(&self, f: impl FnOnce(&I) -> R) -> R {
        self.read(|shared| f(shared.gate.irq()))
    }

    fn read<R>(&self, f: impl FnOnce(&Shared<I, N>) -> R) -> R {
        critical_section::with(|cs| f(&self.shared.borrow_ref(cs)))
    }
}
