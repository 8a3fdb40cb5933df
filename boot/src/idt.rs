//! Interrupt descriptor table.
//!
//! Building the table is a two-stage affair: [`IdtStorage`] owns the raw 256
//! slots and can only be turned into an [`InterruptDescriptorTable`] by
//! [`IdtStorage::build`], which blanks every slot and loads the IDTR. Gates
//! can only be registered on the built table, so "register before build"
//! does not type-check.

use core::ptr;

use ember_abi::BootError;
use ember_abi::arch::x86::idt::{IDT_ENTRIES, IDT_LINEAR_ADDRESS};
use ember_abi::arch::{GateAttributes, IdtEntry, IdtPointer, SegmentSelector};
use ember_lib::{InitFlag, Privileged, klog_debug, klog_info};

use crate::trampoline::HandlerAddress;

/// Where the table lives in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdtPlacement {
    /// The page at `IDT_LINEAR_ADDRESS`, mapped by the loader.
    Fixed,
    /// A table in the kernel image.
    Static,
}

#[repr(C, align(8))]
struct AlignedTable([IdtEntry; IDT_ENTRIES]);

static mut STATIC_TABLE: AlignedTable = AlignedTable([IdtEntry::MISSING; IDT_ENTRIES]);
static TABLE_CLAIMED: InitFlag = InitFlag::new();

/// Hands out the table storage. Succeeds once per boot.
pub fn claim_table(placement: IdtPlacement) -> Result<IdtStorage, BootError> {
    if !TABLE_CLAIMED.claim() {
        return Err(BootError::TableAlreadyClaimed);
    }
    let slots = match placement {
        // SAFETY: the loader maps this page before handoff and nothing else
        // refers to it; the claim above makes this the only reference.
        IdtPlacement::Fixed => unsafe {
            &mut *(IDT_LINEAR_ADDRESS as usize as *mut [IdtEntry; IDT_ENTRIES])
        },
        // SAFETY: guarded by the same one-shot claim.
        IdtPlacement::Static => unsafe { &mut (*(&raw mut STATIC_TABLE)).0 },
    };
    klog_debug!("IDT: storage {:?} at {:#x}", placement, slots.as_ptr() as usize);
    Ok(IdtStorage::new(slots))
}

/// Unbuilt table storage.
pub struct IdtStorage {
    slots: &'static mut [IdtEntry; IDT_ENTRIES],
}

impl IdtStorage {
    pub fn new(slots: &'static mut [IdtEntry; IDT_ENTRIES]) -> Self {
        Self { slots }
    }

    /// Marks every vector not present, then points the IDTR at the table.
    pub fn build<C: Privileged>(self, cpu: &C) -> InterruptDescriptorTable {
        let slots = self.slots;
        for slot in slots.iter_mut() {
            // SAFETY: `slot` is a valid, exclusively borrowed entry.
            unsafe { ptr::write_volatile(slot, IdtEntry::MISSING) };
        }

        let pointer = IdtPointer::new(slots.as_ptr() as usize as u32);
        // SAFETY: the slots are 'static and owned by the returned table.
        unsafe { cpu.load_idt(&pointer) };

        let (base, limit) = (pointer.base(), pointer.limit());
        klog_info!("IDT: loaded base={:#010x} limit={:#x}", base, limit);

        InterruptDescriptorTable { slots, pointer }
    }
}

/// A loaded table. Only this type can register handlers.
pub struct InterruptDescriptorTable {
    slots: &'static mut [IdtEntry; IDT_ENTRIES],
    pointer: IdtPointer,
}

impl InterruptDescriptorTable {
    /// Installs `handler` on `vector` with kernel code selector 0x08.
    ///
    /// The slot is rewritten with interrupts disabled so a half-written gate
    /// is never dispatched through; the previous interrupt state is restored
    /// afterwards. Registering a vector twice replaces the old gate.
    pub fn register_handler<C: Privileged>(
        &mut self,
        cpu: &C,
        vector: u8,
        handler: HandlerAddress,
        attributes: GateAttributes,
    ) {
        let entry = IdtEntry::new(handler.get(), SegmentSelector::KERNEL_CODE, attributes);

        let saved = cpu.save_and_disable_interrupts();
        // SAFETY: `vector` indexes within the 256 slots we own.
        unsafe { ptr::write_volatile(&mut self.slots[vector as usize], entry) };
        cpu.restore_interrupts(saved);

        klog_debug!(
            "IDT: vector {:#04x} -> {:#010x} type {:#04x}",
            vector,
            handler.get(),
            attributes.bits()
        );
    }

    pub fn gate(&self, vector: u8) -> IdtEntry {
        self.slots[vector as usize]
    }

    pub fn is_present(&self, vector: u8) -> bool {
        self.gate(vector).is_present()
    }

    pub fn pointer(&self) -> IdtPointer {
        self.pointer
    }

    pub fn entries(&self) -> &[IdtEntry; IDT_ENTRIES] {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_lib::testing::{CpuEvent, RecordingCpu};
    use std::boxed::Box;

    fn dirty_storage() -> IdtStorage {
        let junk = IdtEntry::new(
            0xDEAD_BEEF,
            SegmentSelector::KERNEL_DATA,
            GateAttributes::KERNEL_TRAP,
        );
        IdtStorage::new(Box::leak(Box::new([junk; IDT_ENTRIES])))
    }

    fn handler(address: u32) -> HandlerAddress {
        unsafe { HandlerAddress::new(address) }
    }

    #[test]
    fn build_blanks_every_slot_and_loads() {
        let cpu = RecordingCpu::new();
        let idt = dirty_storage().build(&cpu);
        assert!(idt.entries().iter().all(IdtEntry::is_missing));
        assert!((0..=255u8).all(|v| !idt.is_present(v)));
        assert_eq!(
            cpu.events(),
            [CpuEvent::LoadIdt {
                base: idt.pointer().base(),
                limit: 2047,
            }]
        );
    }

    #[test]
    fn register_touches_exactly_one_slot() {
        let cpu = RecordingCpu::new();
        let mut idt = dirty_storage().build(&cpu);
        idt.register_handler(
            &cpu,
            0x20,
            handler(0x0010_2A40),
            GateAttributes::KERNEL_INTERRUPT,
        );

        let gate = idt.gate(0x20);
        assert_eq!(gate.offset_low(), 0x2A40);
        assert_eq!(gate.offset_high(), 0x0010);
        assert_eq!(gate.selector().bits(), 0x08);
        assert_eq!(gate.reserved(), 0);
        assert_eq!(gate.attributes().bits(), 0x8E);
        assert_eq!(
            idt.entries().iter().filter(|e| !e.is_missing()).count(),
            1
        );
    }

    #[test]
    fn register_preserves_interrupt_state() {
        let cpu = RecordingCpu::with_interrupts_enabled();
        let mut idt = dirty_storage().build(&cpu);
        cpu.clear();
        idt.register_handler(&cpu, 3, handler(0x1000), GateAttributes::KERNEL_TRAP);
        assert_eq!(
            cpu.events(),
            [
                CpuEvent::DisableInterrupts,
                CpuEvent::RestoreInterrupts { enable: true }
            ]
        );
        assert!(cpu.interrupts_enabled());

        let cold = RecordingCpu::new();
        idt.register_handler(&cold, 4, handler(0x1000), GateAttributes::KERNEL_TRAP);
        assert!(!cold.interrupts_enabled());
    }

    #[test]
    fn attributes_are_stored_verbatim() {
        let cpu = RecordingCpu::new();
        let mut idt = dirty_storage().build(&cpu);
        let odd = GateAttributes::from_bits_retain(0x0E);
        idt.register_handler(&cpu, 0x40, handler(0x1234_5678), odd);
        assert_eq!(idt.gate(0x40).attributes().bits(), 0x0E);
        assert!(!idt.is_present(0x40));
    }

    #[test]
    fn reregistering_replaces_gate() {
        let cpu = RecordingCpu::new();
        let mut idt = dirty_storage().build(&cpu);
        idt.register_handler(&cpu, 0x21, handler(0x1111), GateAttributes::KERNEL_INTERRUPT);
        idt.register_handler(&cpu, 0x21, handler(0x2222_0000), GateAttributes::KERNEL_TRAP);
        let gate = idt.gate(0x21);
        assert_eq!(gate.handler_address(), 0x2222_0000);
        assert_eq!(gate.attributes(), GateAttributes::KERNEL_TRAP);
    }

    #[test]
    fn storage_is_claimed_once() {
        assert!(claim_table(IdtPlacement::Static).is_ok());
        assert_eq!(
            claim_table(IdtPlacement::Static).err(),
            Some(BootError::TableAlreadyClaimed)
        );
        assert_eq!(
            claim_table(IdtPlacement::Fixed).err(),
            Some(BootError::TableAlreadyClaimed)
        );
    }
}
