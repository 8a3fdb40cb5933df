//! 8042 PS/2 controller definitions.

use bitflags::bitflags;

bitflags! {
    /// Status register bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Ps2Status: u8 {
        /// Data is waiting at the data port.
        const OUTPUT_FULL = 0x01;
        /// The controller has not consumed the last command yet.
        const INPUT_FULL = 0x02;
        const SYSTEM_FLAG = 0x04;
        const COMMAND_DATA = 0x08;
        const TIMEOUT_ERROR = 0x40;
        const PARITY_ERROR = 0x80;
    }
}

/// Enable the first PS/2 port (keyboard).
pub const PS2_CMD_ENABLE_KEYBOARD: u8 = 0xAE;

/// Status polls before a wait gives up.
pub const PS2_SPIN_LIMIT: usize = 100_000;
