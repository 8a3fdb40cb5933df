//! 8254 PIT channel 0.
//!
//! Only used when the boot command line asks for a tick rate; otherwise the
//! firmware default (about 18.2 Hz) is left alone.

use ember_abi::arch::Port;
use ember_lib::{PortIo, klog_debug, klog_info};

use crate::hw::pit_defs::{
    PIT_BASE_FREQUENCY_HZ, PIT_COMMAND_ACCESS_LOHI, PIT_COMMAND_BINARY, PIT_COMMAND_CHANNEL0,
    PIT_COMMAND_MODE_SQUARE,
};

/// Reload value for `frequency_hz`, clamped to what the counter can hold.
pub fn divisor_for(frequency_hz: u32) -> u16 {
    let frequency_hz = frequency_hz.clamp(1, PIT_BASE_FREQUENCY_HZ);
    (PIT_BASE_FREQUENCY_HZ / frequency_hz).clamp(1, 0xFFFF) as u16
}

/// Frequency actually produced by `divisor`.
pub fn frequency_for(divisor: u16) -> u32 {
    PIT_BASE_FREQUENCY_HZ / divisor.max(1) as u32
}

/// Programs channel 0 as a square wave generator. Returns the achieved rate.
pub fn set_frequency<P: PortIo>(ports: &P, frequency_hz: u32) -> u32 {
    let divisor = divisor_for(frequency_hz);
    klog_info!("PIT: Initializing timer at {} Hz", frequency_hz);

    ports.write_u8(
        Port::PIT_COMMAND,
        PIT_COMMAND_CHANNEL0 | PIT_COMMAND_ACCESS_LOHI | PIT_COMMAND_MODE_SQUARE | PIT_COMMAND_BINARY,
    );
    ports.write_u8(Port::PIT_CHANNEL0, (divisor & 0xFF) as u8);
    ports.write_u8(Port::PIT_CHANNEL0, (divisor >> 8) as u8);
    ports.io_wait();

    let actual = frequency_for(divisor);
    klog_debug!("PIT: divisor {} gives {} Hz", divisor, actual);
    actual
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_lib::testing::RecordingPorts;

    #[test]
    fn divisor_is_clamped() {
        assert_eq!(divisor_for(100), 11931);
        assert_eq!(divisor_for(0), 0xFFFF);
        assert_eq!(divisor_for(1), 0xFFFF);
        assert_eq!(divisor_for(u32::MAX), 1);
    }

    #[test]
    fn programs_mode_then_low_high() {
        let ports = RecordingPorts::new();
        let actual = set_frequency(&ports, 100);
        assert_eq!(
            ports.writes(),
            [
                (Port::PIT_COMMAND, 0x36),
                (Port::PIT_CHANNEL0, (11931 & 0xFF) as u8),
                (Port::PIT_CHANNEL0, (11931 >> 8) as u8),
            ]
        );
        assert_eq!(actual, 100);
    }
}
