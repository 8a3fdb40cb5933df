//! Kernel singletons and the interrupt handlers that use them.

use ember_abi::vga::VGA_TEXT_BUFFER;
use ember_boot::{HandlerSet, interrupt_trampoline};
use ember_drivers::{Console, TimerHandler, VgaTextBuffer};
use ember_lib::{IrqMutex, klog_info};

/// The only console. Shared with interrupt handlers, hence the `IrqMutex`.
pub static CONSOLE: IrqMutex<Console<VgaTextBuffer>> =
    // SAFETY: the colour text buffer is identity mapped and owned here alone.
    IrqMutex::new(Console::new(unsafe { VgaTextBuffer::at(VGA_TEXT_BUFFER) }));

static TIMER: IrqMutex<TimerHandler> = IrqMutex::new(TimerHandler::new());

fn on_timer_tick() {
    TIMER.lock().on_tick(&mut &CONSOLE);
}

fn on_breakpoint() {
    klog_info!("INT: breakpoint (vector 3)");
    CONSOLE.lock().write_string("#3");
}

fn on_overflow() {
    klog_info!("INT: overflow (vector 4)");
    CONSOLE.lock().write_string("#4");
}

interrupt_trampoline!(irq timer_entry => on_timer_tick);
interrupt_trampoline!(trap breakpoint_entry => on_breakpoint);
interrupt_trampoline!(trap overflow_entry => on_overflow);

pub fn handler_set() -> HandlerSet {
    HandlerSet {
        timer: timer_entry_address(),
        breakpoint: breakpoint_entry_address(),
        overflow: overflow_entry_address(),
    }
}
