//! COM1 polled transmitter.
//!
//! Carries kernel log output. The VGA console is never used for logs.

use ember_abi::arch::Port;
use ember_lib::{HwPorts, IrqMutex, PortIo};

use crate::hw::serial_defs::{
    BAUD_DIVISOR_115200, FCR_ENABLE_CLEAR_14, LCR_8N1, LCR_DLAB, LSR_TX_EMPTY, MCR_DTR_RTS_AUX2,
    REG_FCR, REG_IER, REG_LCR, REG_LSR, REG_MCR, REG_THR, TX_SPIN_LIMIT,
};

/// A 16550-compatible UART at `base`.
pub struct SerialPort<P: PortIo> {
    ports: P,
    base: Port,
}

impl<P: PortIo> SerialPort<P> {
    pub const fn new(ports: P, base: Port) -> Self {
        Self { ports, base }
    }

    fn reg(&self, offset: u16) -> Port {
        self.base.offset(offset)
    }

    /// 115200 baud, 8N1, FIFOs on, receive interrupts off.
    pub fn init(&mut self) {
        self.ports.write_u8(self.reg(REG_IER), 0x00);
        self.ports.write_u8(self.reg(REG_LCR), LCR_DLAB);
        self.ports
            .write_u8(self.reg(REG_THR), (BAUD_DIVISOR_115200 & 0xFF) as u8);
        self.ports
            .write_u8(self.reg(REG_IER), (BAUD_DIVISOR_115200 >> 8) as u8);
        self.ports.write_u8(self.reg(REG_LCR), LCR_8N1);
        self.ports.write_u8(self.reg(REG_FCR), FCR_ENABLE_CLEAR_14);
        self.ports.write_u8(self.reg(REG_MCR), MCR_DTR_RTS_AUX2);
    }

    /// Waits for THR empty, then sends `byte`. A UART that never drains
    /// drops the byte instead of hanging the caller.
    pub fn write_byte(&mut self, byte: u8) {
        for _ in 0..TX_SPIN_LIMIT {
            if self.ports.read_u8(self.reg(REG_LSR)) & LSR_TX_EMPTY != 0 {
                self.ports.write_u8(self.reg(REG_THR), byte);
                return;
            }
            core::hint::spin_loop();
        }
    }

    /// Sends `bytes`, expanding `\n` to `\r\n`.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(b);
        }
    }
}

// SAFETY: COM1 is owned exclusively by this static.
static SERIAL: IrqMutex<SerialPort<HwPorts>> =
    IrqMutex::new(SerialPort::new(unsafe { HwPorts::new() }, Port::COM1));

/// Initialise COM1.
pub fn init() {
    SERIAL.lock().init();
}

/// Raw byte sink for the kernel log.
pub fn write_bytes(bytes: &[u8]) {
    SERIAL.lock().write_bytes(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_lib::testing::RecordingPorts;

    #[test]
    fn init_programs_115200_8n1() {
        let ports = RecordingPorts::new();
        SerialPort::new(&ports, Port::COM1).init();
        assert_eq!(
            ports.writes(),
            [
                (Port(0x3F9), 0x00),
                (Port(0x3FB), 0x80),
                (Port(0x3F8), 0x01),
                (Port(0x3F9), 0x00),
                (Port(0x3FB), 0x03),
                (Port(0x3FA), 0xC7),
                (Port(0x3FC), 0x0B),
            ]
        );
    }

    #[test]
    fn newline_becomes_crlf() {
        let ports = RecordingPorts::new();
        ports.set_default_read(LSR_TX_EMPTY);
        let mut port = SerialPort::new(&ports, Port::COM1);
        port.write_bytes(b"ok\n");
        assert_eq!(
            ports.writes_to(&[Port::COM1]),
            [
                (Port::COM1, b'o'),
                (Port::COM1, b'k'),
                (Port::COM1, b'\r'),
                (Port::COM1, b'\n'),
            ]
        );
    }

    #[test]
    fn waits_for_transmitter_empty() {
        let ports = RecordingPorts::new();
        ports.script(Port(0x3FD), &[0x00, 0x00, LSR_TX_EMPTY]);
        SerialPort::new(&ports, Port::COM1).write_byte(b'x');
        assert_eq!(ports.read_count(Port(0x3FD)), 3);
        assert_eq!(ports.writes(), [(Port::COM1, b'x')]);
    }

    #[test]
    fn dead_uart_drops_byte() {
        let ports = RecordingPorts::new();
        SerialPort::new(&ports, Port::COM1).write_byte(b'x');
        assert!(ports.writes().is_empty());
    }
}
