/// Default transfer buffer capacity in bytes.
pub const FIFO_SIZE: usize = 128;

/// Largest number of bytes handed to the sink per interrupt.
///
/// Matches the transmitter FIFO depth, so one burst never overruns it.
pub const MAX_CHUNK: usize = 8;

