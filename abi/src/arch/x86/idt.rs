//! Interrupt descriptor table layouts for 32-bit protected mode.
//!
//! A gate descriptor is eight bytes:
//!
//! ```text
//! bytes 0-1  handler offset bits 0..16
//! bytes 2-3  code segment selector
//! byte  4    reserved, always zero
//! byte  5    type/attribute byte (P, DPL, S, gate type)
//! bytes 6-7  handler offset bits 16..32
//! ```
//!
//! The IDTR operand is a 16-bit limit followed by a 32-bit linear base.

use bitflags::bitflags;

use super::gdt::SegmentSelector;

/// Number of gate descriptors in the table.
pub const IDT_ENTRIES: usize = 256;

/// Size of one gate descriptor in bytes.
pub const IDT_ENTRY_SIZE: usize = 8;

/// Value loaded into the IDTR limit: the last valid byte offset.
pub const IDT_LIMIT: u16 = (IDT_ENTRIES * IDT_ENTRY_SIZE - 1) as u16;

/// Linear address of the fixed IDT page. The loader maps it before handoff.
pub const IDT_LINEAR_ADDRESS: u32 = 0xFFFF_C000;

/// Vector the master controller's first line is remapped to.
pub const IRQ_BASE_MASTER: u8 = 0x20;

/// Vector the slave controller's first line is remapped to.
pub const IRQ_BASE_SLAVE: u8 = 0x28;

/// Timer tick (IRQ0 after remapping).
pub const TIMER_VECTOR: u8 = IRQ_BASE_MASTER;

/// `int 3`.
pub const EXCEPTION_BREAKPOINT: u8 = 3;

/// `into` / `int 4`.
pub const EXCEPTION_OVERFLOW: u8 = 4;

bitflags! {
    /// Type/attribute byte of a gate descriptor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GateAttributes: u8 {
        const PRESENT = 1 << 7;
        const DPL_RING3 = 3 << 5;
        const STORAGE_SEGMENT = 1 << 4;
        const INTERRUPT_GATE_32 = 0x0E;
        const TRAP_GATE_32 = 0x0F;
    }
}

impl GateAttributes {
    /// Present, ring 0, 32-bit interrupt gate (0x8E). Clears IF on entry.
    pub const KERNEL_INTERRUPT: Self = Self::PRESENT.union(Self::INTERRUPT_GATE_32);

    /// Present, ring 0, 32-bit trap gate (0x8F). Leaves IF untouched.
    pub const KERNEL_TRAP: Self = Self::PRESENT.union(Self::TRAP_GATE_32);

    #[inline]
    pub const fn is_present(self) -> bool {
        self.bits() & Self::PRESENT.bits() != 0
    }

    /// Privilege level required to reach the gate with a software `int`.
    #[inline]
    pub const fn dpl(self) -> u8 {
        (self.bits() >> 5) & 0x3
    }
}

/// One gate descriptor.
///
/// Every field is naturally aligned, so `repr(C)` already yields the packed
/// eight byte hardware layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdtEntry {
    offset_low: u16,
    selector: u16,
    reserved: u8,
    type_attr: u8,
    offset_high: u16,
}

const _: () = assert!(core::mem::size_of::<IdtEntry>() == IDT_ENTRY_SIZE);

impl IdtEntry {
    /// All-zero descriptor. The present bit is clear, so the vector faults.
    pub const MISSING: Self = Self {
        offset_low: 0,
        selector: 0,
        reserved: 0,
        type_attr: 0,
        offset_high: 0,
    };

    pub const fn new(handler: u32, selector: SegmentSelector, attributes: GateAttributes) -> Self {
        Self {
            offset_low: (handler & 0xFFFF) as u16,
            selector: selector.bits(),
            reserved: 0,
            type_attr: attributes.bits(),
            offset_high: (handler >> 16) as u16,
        }
    }

    /// Reassembled 32-bit handler offset.
    #[inline]
    pub const fn handler_address(&self) -> u32 {
        ((self.offset_high as u32) << 16) | self.offset_low as u32
    }

    #[inline]
    pub const fn offset_low(&self) -> u16 {
        self.offset_low
    }

    #[inline]
    pub const fn offset_high(&self) -> u16 {
        self.offset_high
    }

    #[inline]
    pub const fn selector(&self) -> SegmentSelector {
        SegmentSelector(self.selector)
    }

    #[inline]
    pub const fn reserved(&self) -> u8 {
        self.reserved
    }

    #[inline]
    pub const fn attributes(&self) -> GateAttributes {
        GateAttributes::from_bits_retain(self.type_attr)
    }

    #[inline]
    pub const fn is_present(&self) -> bool {
        self.attributes().is_present()
    }

    #[inline]
    pub const fn is_missing(&self) -> bool {
        self.offset_low == 0
            && self.selector == 0
            && self.reserved == 0
            && self.type_attr == 0
            && self.offset_high == 0
    }

    /// Descriptor bytes in memory order.
    pub const fn to_bytes(&self) -> [u8; IDT_ENTRY_SIZE] {
        let low = self.offset_low.to_le_bytes();
        let sel = self.selector.to_le_bytes();
        let high = self.offset_high.to_le_bytes();
        [
            low[0],
            low[1],
            sel[0],
            sel[1],
            self.reserved,
            self.type_attr,
            high[0],
            high[1],
        ]
    }
}

/// IDTR operand for `lidt`.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdtPointer {
    limit: u16,
    base: u32,
}

const _: () = assert!(core::mem::size_of::<IdtPointer>() == 6);

impl IdtPointer {
    /// Pointer describing a full 256 entry table at `base`.
    pub const fn new(base: u32) -> Self {
        Self {
            limit: IDT_LIMIT,
            base,
        }
    }

    #[inline]
    pub const fn limit(&self) -> u16 {
        self.limit
    }

    #[inline]
    pub const fn base(&self) -> u32 {
        self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_attribute_values() {
        assert_eq!(GateAttributes::KERNEL_INTERRUPT.bits(), 0x8E);
        assert_eq!(GateAttributes::KERNEL_TRAP.bits(), 0x8F);
        assert!(GateAttributes::KERNEL_TRAP.is_present());
        assert_eq!(GateAttributes::KERNEL_INTERRUPT.dpl(), 0);
        assert_eq!(GateAttributes::from_bits_retain(0xEE).dpl(), 3);
        assert!(!GateAttributes::INTERRUPT_GATE_32.is_present());
    }

    #[test]
    fn entry_splits_handler_offset() {
        let entry = IdtEntry::new(
            0x0010_2A40,
            SegmentSelector::KERNEL_CODE,
            GateAttributes::KERNEL_INTERRUPT,
        );
        assert_eq!(entry.offset_low(), 0x2A40);
        assert_eq!(entry.offset_high(), 0x0010);
        assert_eq!(entry.handler_address(), 0x0010_2A40);
        assert_eq!(entry.selector(), SegmentSelector::KERNEL_CODE);
        assert_eq!(entry.reserved(), 0);
        assert!(entry.is_present());
        assert_eq!(
            entry.to_bytes(),
            [0x40, 0x2A, 0x08, 0x00, 0x00, 0x8E, 0x10, 0x00]
        );
    }

    #[test]
    fn missing_entry_is_all_zero() {
        assert!(IdtEntry::MISSING.is_missing());
        assert!(!IdtEntry::MISSING.is_present());
        assert_eq!(IdtEntry::MISSING.to_bytes(), [0; IDT_ENTRY_SIZE]);
        assert_eq!(IdtEntry::default(), IdtEntry::MISSING);
    }

    #[test]
    fn pointer_covers_whole_table() {
        let ptr = IdtPointer::new(IDT_LINEAR_ADDRESS);
        assert_eq!(ptr.limit(), 2047);
        assert_eq!(ptr.base(), 0xFFFF_C000);
    }
}
