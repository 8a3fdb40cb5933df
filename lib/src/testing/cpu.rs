use core::cell::{Cell, RefCell};
use std::vec::Vec;

use ember_abi::arch::IdtPointer;

use crate::cpu::{INTERRUPT_FLAG, Privileged, SavedFlags};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuEvent {
    LoadIdt { base: u32, limit: u16 },
    DisableInterrupts,
    RestoreInterrupts { enable: bool },
    EnableInterrupts,
    Raise(u8),
}

/// [`Privileged`] backend that records each operation and models IF.
pub struct RecordingCpu {
    events: RefCell<Vec<CpuEvent>>,
    interrupts_enabled: Cell<bool>,
}

impl RecordingCpu {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            interrupts_enabled: Cell::new(false),
        }
    }

    /// Starts with IF set, as after a prior `sti`.
    pub fn with_interrupts_enabled() -> Self {
        let cpu = Self::new();
        cpu.interrupts_enabled.set(true);
        cpu
    }

    pub fn events(&self) -> Vec<CpuEvent> {
        self.events.borrow().clone()
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled.get()
    }

    pub fn raised(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                CpuEvent::Raise(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: CpuEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Default for RecordingCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Privileged for RecordingCpu {
    unsafe fn load_idt(&self, pointer: &IdtPointer) {
        self.record(CpuEvent::LoadIdt {
            base: pointer.base(),
            limit: pointer.limit(),
        });
    }

    fn save_and_disable_interrupts(&self) -> SavedFlags {
        let bits = if self.interrupts_enabled.get() {
            INTERRUPT_FLAG | 0x2
        } else {
            0x2
        };
        self.interrupts_enabled.set(false);
        self.record(CpuEvent::DisableInterrupts);
        SavedFlags::from_bits(bits)
    }

    fn restore_interrupts(&self, saved: SavedFlags) {
        let enable = saved.interrupts_enabled();
        if enable {
            self.interrupts_enabled.set(true);
        }
        self.record(CpuEvent::RestoreInterrupts { enable });
    }

    fn enable_interrupts(&self) {
        self.interrupts_enabled.set(true);
        self.record(CpuEvent::EnableInterrupts);
    }

    unsafe fn raise<const VECTOR: u8>(&self) {
        self.record(CpuEvent::Raise(VECTOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_models_interrupt_flag() {
        let cpu = RecordingCpu::with_interrupts_enabled();
        let saved = cpu.save_and_disable_interrupts();
        assert!(saved.interrupts_enabled());
        assert!(!cpu.interrupts_enabled());
        cpu.restore_interrupts(saved);
        assert!(cpu.interrupts_enabled());

        let cold = RecordingCpu::new();
        let saved = cold.save_and_disable_interrupts();
        cold.restore_interrupts(saved);
        assert!(!cold.interrupts_enabled());
        assert_eq!(
            cold.events(),
            [
                CpuEvent::DisableInterrupts,
                CpuEvent::RestoreInterrupts { enable: false }
            ]
        );
    }
}
