//! 32-bit x86 protected-mode definitions.
//!
//! Raw integer constants are wrapped in newtypes to prevent misuse:
//! - `SegmentSelector(u16)` for GDT selectors
//! - `Port(u16)` for I/O port addresses
//! - `GateAttributes` bitflags for IDT type/attribute bytes

pub mod gdt;
pub mod idt;
pub mod ports;

pub use gdt::SegmentSelector;
pub use idt::{GateAttributes, IdtEntry, IdtPointer};
pub use ports::Port;
