#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod early_init;
pub mod idt;
pub mod kernel_panic;
pub mod trampoline;

#[doc(hidden)]
pub use paste;

pub use config::BootConfig;
pub use early_init::{HandlerSet, boot_kernel, install_interrupts, run_smoke_test};
pub use idt::{IdtPlacement, IdtStorage, InterruptDescriptorTable, claim_table};
pub use kernel_panic::kernel_panic;
pub use trampoline::HandlerAddress;
