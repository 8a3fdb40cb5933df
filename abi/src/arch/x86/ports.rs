//! x86 I/O port addresses.
//!
//! A `Port` newtype groups every port number the kernel touches so that
//! arbitrary u16 values are never passed to IN/OUT by accident.

/// x86 I/O port address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Port(pub u16);

impl Port {
    // =========================================================================
    // Serial (8250/16550 UART)
    // =========================================================================

    /// COM1 serial port base address.
    pub const COM1: Self = Self(0x3F8);

    // =========================================================================
    // Programmable Interval Timer (8254 PIT)
    // =========================================================================

    /// PIT Channel 0 data port.
    pub const PIT_CHANNEL0: Self = Self(0x40);

    /// PIT Command/mode register port.
    pub const PIT_COMMAND: Self = Self(0x43);

    // =========================================================================
    // PS/2 Controller (8042)
    // =========================================================================

    /// PS/2 data port, scan codes are read here.
    pub const PS2_DATA: Self = Self(0x60);

    /// PS/2 status register (read).
    pub const PS2_STATUS: Self = Self(0x64);

    /// PS/2 controller command register (write). Same number as the status port.
    pub const PS2_COMMAND: Self = Self(0x64);

    // =========================================================================
    // Legacy PIC (8259)
    // =========================================================================

    /// Master PIC command port.
    pub const PIC1_COMMAND: Self = Self(0x20);

    /// Master PIC data port.
    pub const PIC1_DATA: Self = Self(0x21);

    /// Slave PIC command port.
    pub const PIC2_COMMAND: Self = Self(0xA0);

    /// Slave PIC data port.
    pub const PIC2_DATA: Self = Self(0xA1);

    // =========================================================================
    // Misc
    // =========================================================================

    /// POST diagnostic port. Writes to it take roughly a microsecond.
    pub const POST_DELAY: Self = Self(0x80);

    #[inline]
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    #[inline]
    pub const fn number(self) -> u16 {
        self.0
    }

    /// Port at a register offset from this base (UART registers).
    #[inline]
    pub const fn offset(self, off: u16) -> Self {
        Self(self.0 + off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_values() {
        assert_eq!(Port::PIC1_COMMAND.number(), 0x20);
        assert_eq!(Port::PIC2_DATA.number(), 0xA1);
        assert_eq!(Port::PS2_STATUS, Port::PS2_COMMAND);
        assert_eq!(Port::COM1.offset(5).number(), 0x3FD);
    }
}
