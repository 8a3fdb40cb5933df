//! 16550 UART serial port definitions.

// ============================================================================
// UART Register Offsets (8250/16450/16550 family)
// ============================================================================

/// Transmitter Holding Register / divisor low byte with DLAB set
pub(crate) const REG_THR: u16 = 0;
/// Interrupt Enable Register / divisor high byte with DLAB set
pub(crate) const REG_IER: u16 = 1;
/// FIFO Control Register (write)
pub(crate) const REG_FCR: u16 = 2;
/// Line Control Register
pub(crate) const REG_LCR: u16 = 3;
/// Modem Control Register
pub(crate) const REG_MCR: u16 = 4;
/// Line Status Register
pub(crate) const REG_LSR: u16 = 5;

/// Divisor Latch Access Bit
pub(crate) const LCR_DLAB: u8 = 0x80;
/// 8 data bits, no parity, 1 stop bit
pub(crate) const LCR_8N1: u8 = 0x03;

/// Enable and clear both FIFOs, 14-byte threshold
pub(crate) const FCR_ENABLE_CLEAR_14: u8 = 0xC7;

/// Transmitter holding register empty
pub(crate) const LSR_TX_EMPTY: u8 = 0x20;

/// Data Terminal Ready | Request To Send | Auxiliary output 2
pub(crate) const MCR_DTR_RTS_AUX2: u8 = 0x0B;

/// 115200 baud with the standard 1.8432 MHz clock
pub(crate) const BAUD_DIVISOR_115200: u16 = 1;

/// LSR polls before a byte is dropped.
pub(crate) const TX_SPIN_LIMIT: usize = 100_000;
