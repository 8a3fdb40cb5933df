#![no_std]
#![no_main]
#![forbid(unsafe_op_in_unsafe_fn)]

mod handlers;

use core::ffi::c_char;
use core::fmt::Write;
use core::panic::PanicInfo;

use ember_boot as boot;
use ember_lib::cpu;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    cpu::disable_interrupts();
    if let Some(mut console) = handlers::CONSOLE.try_lock() {
        let _ = write!(console, "PANIC: {}", info.message());
    }
    boot::kernel_panic::kernel_panic_args(format_args!("{}", info))
}

/// Loader handoff: 32-bit protected mode, flat GDT with ring 0 code at
/// selector 0x08, interrupts disabled, `cmdline` null or NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn kernel_main(cmdline: *const c_char) -> ! {
    // SAFETY: called once by the loader under the contract above.
    unsafe { boot::boot_kernel(cmdline, handlers::handler_set(), &handlers::CONSOLE) }
}
