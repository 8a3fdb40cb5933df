//! Architecture-specific definitions.
//!
//! Only 32-bit protected mode is described. The definitions are plain data and
//! compile on any host so the kernel crates can be unit tested off target.

pub mod x86;

pub use x86::*;
