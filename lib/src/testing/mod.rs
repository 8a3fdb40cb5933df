//! Host-side fakes for unit tests.
//!
//! Enabled by `cfg(test)` inside this crate and by the `testing` feature for
//! downstream dev-dependencies. Nothing here is linked into the kernel image.

mod cpu;
mod ports;

pub use cpu::{CpuEvent, RecordingCpu};
pub use ports::{PortAccess, RecordingPorts};
