#![no_std]

#[cfg(any(test, feature = "testing"))]
extern crate std;

pub mod cpu;
pub mod init_flag;
pub mod io;
pub mod klog;
pub mod numfmt;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cpu::{Privileged, SavedFlags, X86Cpu};
pub use init_flag::{InitFlag, StateFlag};
pub use io::{HwPorts, PortIo};
pub use klog::{
    klog_attach_sink, klog_get_level, klog_init, klog_is_enabled, klog_set_level, KlogLevel,
};
pub use sync::{IrqMutex, IrqMutexGuard};
