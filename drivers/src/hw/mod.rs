//! Register-level constants for the legacy PC devices.
//!
//! Port numbers live in `ember_abi::arch::Port`; these modules hold the
//! command bytes and status bits written to and read from those ports.

pub mod pic_defs;
pub mod pit_defs;
pub mod ps2_defs;
pub mod serial_defs;
