//! Privileged CPU instructions.
//!
//! The free functions are thin inline-asm wrappers. Code that has to be unit
//! tested off target goes through the [`Privileged`] trait instead, with
//! [`X86Cpu`] as the real backend.

use core::arch::asm;

use ember_abi::arch::IdtPointer;

/// EFLAGS.IF
pub const INTERRUPT_FLAG: usize = 1 << 9;

#[inline(always)]
pub fn hlt() {
    unsafe {
        asm!("hlt", options(nomem, nostack, preserves_flags));
    }
}

#[inline(always)]
pub fn pause() {
    unsafe {
        asm!("pause", options(nomem, nostack, preserves_flags));
    }
}

#[inline(always)]
pub fn enable_interrupts() {
    unsafe {
        asm!("sti", options(nomem, nostack));
    }
}

#[inline(always)]
pub fn disable_interrupts() {
    unsafe {
        asm!("cli", options(nomem, nostack));
    }
}

#[inline(always)]
pub fn halt_loop() -> ! {
    loop {
        hlt();
    }
}

#[inline(always)]
pub fn read_flags() -> usize {
    let flags: usize;
    unsafe {
        #[cfg(target_arch = "x86")]
        asm!("pushfd", "pop {}", out(reg) flags, options(nomem, preserves_flags));
        #[cfg(target_arch = "x86_64")]
        asm!("pushfq", "pop {}", out(reg) flags, options(nomem, preserves_flags));
    }
    flags
}

/// Loads the IDTR.
///
/// # Safety
/// `pointer` must describe a table that stays mapped and valid for as long as
/// interrupts can be delivered through it.
#[inline(always)]
pub unsafe fn load_idt(pointer: &IdtPointer) {
    unsafe {
        asm!(
            "lidt [{}]",
            in(reg) pointer as *const IdtPointer,
            options(readonly, nostack, preserves_flags)
        );
    }
}

/// Interrupt state captured by [`Privileged::save_and_disable_interrupts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct SavedFlags(usize);

impl SavedFlags {
    #[inline]
    pub const fn from_bits(bits: usize) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn interrupts_enabled(self) -> bool {
        self.0 & INTERRUPT_FLAG != 0
    }
}

/// Ring 0 operations used by interrupt setup.
pub trait Privileged {
    /// # Safety
    /// Same contract as [`load_idt`].
    unsafe fn load_idt(&self, pointer: &IdtPointer);

    /// Saves EFLAGS and clears IF.
    fn save_and_disable_interrupts(&self) -> SavedFlags;

    /// Sets IF again only if it was set when `saved` was captured.
    fn restore_interrupts(&self, saved: SavedFlags);

    fn enable_interrupts(&self);

    /// Raises software interrupt `VECTOR`.
    ///
    /// # Safety
    /// The gate for `VECTOR` must be present and its handler must return with
    /// `iret`.
    unsafe fn raise<const VECTOR: u8>(&self);
}

/// The executing CPU.
#[derive(Clone, Copy, Debug)]
pub struct X86Cpu {
    _private: (),
}

impl X86Cpu {
    /// # Safety
    /// The caller must be running in ring 0.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Privileged for X86Cpu {
    #[inline]
    unsafe fn load_idt(&self, pointer: &IdtPointer) {
        unsafe { load_idt(pointer) }
    }

    #[inline]
    fn save_and_disable_interrupts(&self) -> SavedFlags {
        let flags = read_flags();
        disable_interrupts();
        SavedFlags(flags)
    }

    #[inline]
    fn restore_interrupts(&self, saved: SavedFlags) {
        if saved.interrupts_enabled() {
            enable_interrupts();
        }
    }

    #[inline]
    fn enable_interrupts(&self) {
        enable_interrupts();
    }

    #[inline]
    unsafe fn raise<const VECTOR: u8>(&self) {
        unsafe {
            asm!("int {v}", v = const VECTOR, options(nomem, nostack));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_flags_track_interrupt_bit() {
        assert!(SavedFlags::from_bits(0x202).interrupts_enabled());
        assert!(!SavedFlags::from_bits(0x002).interrupts_enabled());
        assert_eq!(SavedFlags::from_bits(0x246).bits(), 0x246);
    }
}
