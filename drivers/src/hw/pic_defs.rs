//! Legacy 8259 PIC command words.

// ============================================================================
// Initialisation Command Words
// ============================================================================

/// ICW1: edge triggered, cascade mode, ICW4 follows.
pub const ICW1_INIT_ICW4: u8 = 0x11;
/// ICW3 for the master: a slave hangs off line 2.
pub const ICW3_MASTER_SLAVE_ON_IRQ2: u8 = 0x04;
/// ICW3 for the slave: its cascade identity is 2.
pub const ICW3_SLAVE_CASCADE_ID: u8 = 0x02;
/// ICW4: 8086/88 mode.
pub const ICW4_8086: u8 = 0x01;

// ============================================================================
// Operation Command Words
// ============================================================================

/// Non-specific End of Interrupt.
pub const PIC_EOI: u8 = 0x20;

/// Interrupt lines handled by each controller.
pub const PIC_LINES: u8 = 8;
