//! Ember hardware encodings
//!
//! Plain data definitions shared between the ember kernel crates: I/O port
//! numbers, segment selectors, interrupt gate layouts, VGA text cells and the
//! error enums returned by boot code. Nothing in here touches hardware.

#![no_std]
#![forbid(unsafe_code)]

pub mod arch;
pub mod error;
pub mod vga;

pub use error::*;
pub use vga::*;
