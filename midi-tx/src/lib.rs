//! # midi-tx
//!
//! A `no_std`, allocation-free transmit path for serial MIDI (or any byte
//! stream) driven by a hardware transmit interrupt. Bytes submitted by
//! application code are staged in a bounded buffer and drained in small
//! bursts from the interrupt handler; the interrupt is armed only while
//! there is something to send.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Storage | [`buffer`] | Fixed-capacity byte FIFO |
//! | Control | [`gate`] | Transmit-interrupt armed/disarmed state |
//! | Producer | [`trigger`] | Fit offered bytes into the buffer, report dropouts |
//! | Consumer | [`drain`] | Per-interrupt chunk to the byte sink |
//! | Surface | [`session`] | `open` / `close` / `on_submission_ready` / `on_interrupt` |
//! | Edges | [`port`] | `ByteSink`, `SubmissionSource`, `TxInterrupt` traits |
//! | Hosted | [`hosted`] | Interrupt emulated by a worker thread (`std` feature) |
//!
//! ## Quick start
//!
//! ```ignore
//! use midi_tx::port::{ByteSink, SliceSource, TxInterrupt};
//! use midi_tx::session::Session;
//!
//! static MIDI_OUT: Session<UartTxIrq> = Session::new(UartTxIrq);
//!
//! MIDI_OUT.open();
//!
//! // Application code:
//! let report = MIDI_OUT.on_submission_ready(&mut SliceSource::new(&[0x90, 60, 100]))?;
//! if report.is_dropout() {
//!     // report.dropped bytes were lost
//! }
//!
//! // Transmit interrupt handler:
//! let _ = MIDI_OUT.on_interrupt(&mut uart_tx);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `std` | no | [`hosted`] runtime, `std::error::Error` for [`SessionError`] |
//!
//! ## Parameters
//!
//! - **Buffer capacity:** 128 bytes ([`constants::FIFO_SIZE`], const generic)
//! - **Burst per interrupt:** up to 8 bytes ([`constants::MAX_CHUNK`])
//!
//! The critical sections use the [`critical-section`](critical_section)
//! crate; the final binary must provide an implementation (for example
//! `cortex-m`'s `critical-section-single-core`, or `critical-section/std`
//! on hosted targets).

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod constants;
pub mod buffer;
pub mod gate;
pub mod port;
pub mod drain;
pub mod trigger;
pub mod stats;
pub mod error;
pub mod session;

#[cfg(any(test, feature = "std"))]
pub mod hosted;

#[cfg(test)]
mod mock;


pub use drain::DrainOutcome;
pub use error::SessionError;
pub use port::{ByteSink, SliceSource, SubmissionSource, TxInterrupt};
pub use session::Session;
pub use stats::SessionStats;
pub use trigger::SubmitReport;
