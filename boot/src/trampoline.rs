//! Interrupt entry stubs.
//!
//! A gate has to point at code that preserves every general purpose register
//! and returns with `iretd`. [`interrupt_trampoline!`] generates that code
//! around an ordinary Rust function:
//!
//! ```text
//! entry:  pushad
//!         cld
//!         call <entry>_dispatch     ; handler(), then EOI for `irq` stubs
//!         popad
//!         iretd
//! ```
//!
//! `irq` stubs go through [`dispatch_irq`] and acknowledge *both* 8259s after
//! the handler returns, whichever one raised the line. For IRQ0 the extra
//! slave EOI is harmless; handlers for slave lines that need precise
//! acknowledgment should use `Pics::end_of_interrupt` from a `trap` stub.
//!
//! The assembly is only emitted for 32-bit x86. On other targets the stub's
//! address falls back to the dispatch function so host builds link.

use ember_drivers::Pics;
use ember_lib::{HwPorts, PortIo};

/// Linear address of an interrupt entry stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct HandlerAddress(u32);

impl HandlerAddress {
    /// # Safety
    /// `address` must be the entry of code that preserves all registers and
    /// returns with `iretd`, such as a stub from [`interrupt_trampoline!`].
    pub const unsafe fn new(address: u32) -> Self {
        Self(address)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Body of an `irq` stub: runs `handler`, then sends EOI to the master and
/// the slave, in that order.
pub fn dispatch_irq<P: PortIo>(handler: impl FnOnce(), ports: &P) {
    handler();
    Pics::REMAPPED.end_of_interrupt_all(ports);
}

#[doc(hidden)]
pub fn dispatch_legacy_irq(handler: fn()) {
    // SAFETY: only reachable from interrupt context in ring 0.
    let ports = unsafe { HwPorts::new() };
    dispatch_irq(handler, &ports);
}

/// Defines an entry stub `$entry` that calls `$handler` and a function
/// `<$entry>_address()` returning its [`HandlerAddress`].
///
/// ```ignore
/// fn on_tick() { /* ... */ }
/// interrupt_trampoline!(irq timer_entry => on_tick);
/// idt.register_handler(&cpu, TIMER_VECTOR, timer_entry_address(), GateAttributes::KERNEL_INTERRUPT);
/// ```
#[macro_export]
macro_rules! interrupt_trampoline {
    (irq $entry:ident => $handler:path) => {
        $crate::interrupt_trampoline!(@stub $entry, {
            $crate::trampoline::dispatch_legacy_irq($handler);
        });
    };
    (trap $entry:ident => $handler:path) => {
        $crate::interrupt_trampoline!(@stub $entry, {
            $handler();
        });
    };
    (@stub $entry:ident, $body:block) => {
        $crate::paste::paste! {
            extern "C" fn [<$entry _dispatch>]() $body

            #[cfg(target_arch = "x86")]
            ::core::arch::global_asm!(
                ".pushsection .text",
                concat!(".global ", stringify!($entry)),
                concat!(stringify!($entry), ":"),
                "pushad",
                "cld",
                "call {dispatch}",
                "popad",
                "iretd",
                ".popsection",
                dispatch = sym [<$entry _dispatch>],
            );

            #[cfg(target_arch = "x86")]
            unsafe extern "C" {
                fn $entry();
            }

            pub fn [<$entry _address>]() -> $crate::trampoline::HandlerAddress {
                #[cfg(target_arch = "x86")]
                let target = $entry as *const () as usize;
                #[cfg(not(target_arch = "x86"))]
                let target = [<$entry _dispatch>] as *const () as usize;
                // SAFETY: on x86 `target` is the stub assembled above.
                unsafe { $crate::trampoline::HandlerAddress::new(target as u32) }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use ember_abi::arch::Port;
    use ember_lib::testing::RecordingPorts;

    static CALLS: AtomicU32 = AtomicU32::new(0);

    fn count_call() {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    crate::interrupt_trampoline!(trap count_entry => count_call);
    crate::interrupt_trampoline!(irq tick_entry => count_call);

    #[test]
    fn trap_dispatch_runs_handler() {
        let before = CALLS.load(Ordering::SeqCst);
        count_entry_dispatch();
        assert_eq!(CALLS.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn irq_dispatch_acknowledges_both_pics_after_handler() {
        let ports = RecordingPorts::new();
        let marker = Port::new(0xE9);
        dispatch_irq(|| ports.write_u8(marker, 0x42), &ports);
        assert_eq!(
            ports.writes(),
            [
                (marker, 0x42),
                (Port::PIC1_COMMAND, 0x20),
                (Port::PIC2_COMMAND, 0x20),
            ]
        );
    }

    #[test]
    fn address_wraps_raw_value() {
        let addr = unsafe { HandlerAddress::new(0x0010_0000) };
        assert_eq!(addr.get(), 0x0010_0000);
    }

    #[cfg(not(target_arch = "x86"))]
    #[test]
    fn host_address_falls_back_to_dispatch() {
        let trap = count_entry_dispatch as extern "C" fn() as usize as u32;
        let irq = tick_entry_dispatch as extern "C" fn() as usize as u32;
        assert_eq!(count_entry_address().get(), trap);
        assert_eq!(tick_entry_address().get(), irq);
    }
}
