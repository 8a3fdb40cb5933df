//! Polled PS/2 keyboard dump.
//!
//! Enables the first PS/2 port and then copies a fixed number of raw bytes
//! from the data port to a text sink, one byte and a line-feed glyph per
//! read. Reads are not gated on the output-full bit, so repeats and stale
//! bytes are expected; this is a diagnostic, not an input driver.

use ember_abi::DeviceError;
use ember_abi::arch::Port;
use ember_lib::{PortIo, cpu, klog_debug};

use crate::console::TextSink;
use crate::hw::ps2_defs::{PS2_CMD_ENABLE_KEYBOARD, PS2_SPIN_LIMIT, Ps2Status};

/// Reads per [`KeyboardPoller::poll_once`].
pub const POLL_ITERATIONS: usize = 100;

pub struct KeyboardPoller<P: PortIo> {
    ports: P,
    iterations: usize,
}

impl<P: PortIo> KeyboardPoller<P> {
    pub const fn new(ports: P) -> Self {
        Self::with_iterations(ports, POLL_ITERATIONS)
    }

    pub const fn with_iterations(ports: P, iterations: usize) -> Self {
        Self { ports, iterations }
    }

    fn status(&self) -> Ps2Status {
        Ps2Status::from_bits_retain(self.ports.read_u8(Port::PS2_STATUS))
    }

    /// Spins while `flag` is set. Gives up after `PS2_SPIN_LIMIT` polls.
    fn wait_while(&self, flag: Ps2Status) -> Result<(), DeviceError> {
        let mut status = Ps2Status::empty();
        for _ in 0..PS2_SPIN_LIMIT {
            status = self.status();
            if !status.contains(flag) {
                return Ok(());
            }
            cpu::pause();
        }
        Err(DeviceError::Ps2Timeout(status.bits()))
    }

    /// Writes the enable-keyboard command to the controller command port.
    ///
    /// The command is only sent once both buffers have drained. A stuck
    /// status bit aborts before the write.
    pub fn enable(&self) -> Result<(), DeviceError> {
        self.wait_while(Ps2Status::OUTPUT_FULL)?;
        self.wait_while(Ps2Status::INPUT_FULL)?;
        self.ports
            .write_u8(Port::PS2_COMMAND, PS2_CMD_ENABLE_KEYBOARD);
        self.wait_while(Ps2Status::INPUT_FULL)
    }

    /// Enables the keyboard, then emits `iterations` raw data-port bytes to
    /// `sink`, each followed by `\n`. Returns the number of bytes read.
    /// Nothing is read if the controller never becomes ready.
    pub fn poll_once<S: TextSink>(&self, sink: &mut S) -> Result<usize, DeviceError> {
        self.enable()?;
        for _ in 0..self.iterations {
            let scancode = self.ports.read_u8(Port::PS2_DATA);
            klog_debug!("PS/2: scancode {:#04x}", scancode);
            sink.put_bytes(&[scancode, b'\n']);
        }
        Ok(self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_abi::vga::VGA_CELLS;
    use ember_lib::testing::{PortAccess, RecordingPorts};
    use std::vec::Vec;

    use crate::console::Console;

    struct Collect(Vec<u8>);

    impl TextSink for Collect {
        fn put_bytes(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes);
        }
    }

    #[test]
    fn enable_command_goes_to_command_port() {
        let ports = RecordingPorts::new();
        assert_eq!(KeyboardPoller::new(&ports).enable(), Ok(()));
        assert_eq!(ports.writes(), [(Port::PS2_COMMAND, 0xAE)]);
        assert_eq!(Port::PS2_COMMAND.number(), 0x64);
    }

    #[test]
    fn waits_for_buffers_around_enable() {
        let ports = RecordingPorts::new();
        ports.script(Port::PS2_STATUS, &[0x01, 0x01, 0x00, 0x02, 0x00, 0x02, 0x00]);
        assert_eq!(KeyboardPoller::with_iterations(&ports, 0).enable(), Ok(()));
        let log = ports.accesses();
        let write_at = log
            .iter()
            .position(|a| *a == PortAccess::Write(Port::PS2_COMMAND, 0xAE))
            .unwrap();
        assert_eq!(write_at, 5);
        assert_eq!(ports.read_count(Port::PS2_STATUS), 7);
    }

    #[test]
    fn emits_each_byte_followed_by_newline() {
        let ports = RecordingPorts::new();
        ports.script(Port::PS2_DATA, &[0x1E, 0x9E]);
        ports.set_default_read(0x00);
        let mut sink = Collect(Vec::new());
        let n = KeyboardPoller::new(&ports).poll_once(&mut sink);
        assert_eq!(n, Ok(POLL_ITERATIONS));
        assert_eq!(sink.0.len(), 2 * POLL_ITERATIONS);
        assert_eq!(&sink.0[..4], &[0x1E, b'\n', 0x9E, b'\n']);
        assert!(sink.0.chunks(2).all(|pair| pair[1] == b'\n'));
        assert_eq!(ports.read_count(Port::PS2_DATA), POLL_ITERATIONS);
    }

    #[test]
    fn poll_advances_console_by_two_hundred_cells() {
        let ports = RecordingPorts::new();
        let mut console = Console::new([0u16; VGA_CELLS]);
        console.init();
        assert!(KeyboardPoller::new(&ports).poll_once(&mut console).is_ok());
        assert_eq!(console.cursor(), (2, 40));
    }

    #[test]
    fn stuck_output_buffer_times_out() {
        let ports = RecordingPorts::new();
        ports.set_default_read(0xFF);
        let poller = KeyboardPoller::with_iterations(&ports, 1);
        assert_eq!(
            poller.wait_while(Ps2Status::OUTPUT_FULL),
            Err(DeviceError::Ps2Timeout(0xFF))
        );
        assert_eq!(ports.read_count(Port::PS2_STATUS), PS2_SPIN_LIMIT);
    }

    #[test]
    fn stuck_input_buffer_skips_command_and_reads() {
        let ports = RecordingPorts::new();
        ports.set_default_read(0x02);
        let mut sink = Collect(Vec::new());
        let result = KeyboardPoller::with_iterations(&ports, 3).poll_once(&mut sink);
        assert_eq!(result, Err(DeviceError::Ps2Timeout(0x02)));
        assert!(ports.writes().is_empty());
        assert_eq!(ports.read_count(Port::PS2_DATA), 0);
        assert!(sink.0.is_empty());
    }
}
