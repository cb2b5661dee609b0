//! Transmit-interrupt gate.
//!
//! [`InterruptGate`] pairs the logical armed/disarmed state with the
//! hardware enable control. While armed, the transmitter keeps raising
//! interrupts (each one runs the drain path); while disarmed, no drain
//! invocation is expected until the next [`arm()`](InterruptGate::arm).
//!
//! Both operations are idempotent and write the hardware control every time,
//! so a spurious mismatch between logical and hardware state heals on the
//! next call.

use crate::port::TxInterrupt;

/// Armed/disarmed state plus the interrupt enable control it drives.
pub struct InterruptGate<I> {
    irq: I,
    armed: bool,
}

impl<I: TxInterrupt> InterruptGate<I> {
    /// Create a disarmed gate. The hardware control is not touched.
    pub const fn new(irq: I) -> Self {
        InterruptGate { irq, armed: false }
    }

    /// Enable the transmit interrupt.
    pub fn arm(&mut self) {
        self.irq.enable();
        self.armed = true;
    }

    /// Disable the transmit interrupt.
    pub fn disarm(&mut self) {
        self.irq.disable();
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Borrow the underlying enable control.
    pub fn irq(&self) -> &I {
        &self.irq
    }
}
