use core::fmt;

use ember_lib::{StateFlag, cpu, klog_error};

static PANIC_IN_PROGRESS: StateFlag = StateFlag::new();

/// Disables interrupts, reports `message` on the kernel log and halts.
pub fn kernel_panic(message: &str) -> ! {
    kernel_panic_args(format_args!("{}", message))
}

pub fn kernel_panic_args(args: fmt::Arguments<'_>) -> ! {
    cpu::disable_interrupts();

    // A panic while reporting a panic only halts.
    if PANIC_IN_PROGRESS.enter() {
        klog_error!("=== KERNEL PANIC ===");
        klog_error!("PANIC: {}", args);
        klog_error!("System halted.");
    }

    cpu::halt_loop()
}
