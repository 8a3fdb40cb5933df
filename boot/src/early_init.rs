//! Boot sequence.
//!
//! `boot_kernel` runs a fixed list of steps: bring up the serial log, apply
//! the command line, clear the console and greet, build the interrupt table
//! and remap the PICs, optionally smoke-test the table, enable interrupts,
//! optionally dump the keyboard, then idle. A failing step ends in
//! [`kernel_panic`].

use core::ffi::c_char;

use ember_abi::arch::GateAttributes;
use ember_abi::arch::x86::idt::{EXCEPTION_BREAKPOINT, EXCEPTION_OVERFLOW, TIMER_VECTOR};
use ember_abi::{BootError, BootResult, ConfigError};
use ember_drivers::{Console, KeyboardPoller, Pics, VgaTextBuffer, pit, serial};
use ember_lib::{
    HwPorts, IrqMutex, KlogLevel, PortIo, Privileged, X86Cpu, cpu, klog_attach_sink, klog_debug,
    klog_info, klog_init, klog_is_enabled, klog_set_level, klog_warn,
};

use crate::config::{BootConfig, cmdline_from_ptr};
use crate::idt::{IdtStorage, InterruptDescriptorTable, claim_table};
use crate::kernel_panic::kernel_panic_args;
use crate::trampoline::HandlerAddress;

pub const GREETING: &str = "Hello, kernel World!\n";

/// Entry stubs the kernel installs.
#[derive(Clone, Copy, Debug)]
pub struct HandlerSet {
    /// IRQ0, interrupt gate.
    pub timer: HandlerAddress,
    /// Vector 3, trap gate.
    pub breakpoint: HandlerAddress,
    /// Vector 4, trap gate.
    pub overflow: HandlerAddress,
}

/// Builds and loads the table, remaps the PICs, optionally programs the PIT,
/// and installs the handler set. Interrupts are left as they were.
pub fn install_interrupts<P: PortIo, C: Privileged>(
    storage: IdtStorage,
    ports: &P,
    cpu: &C,
    handlers: &HandlerSet,
    pit_hz: u32,
) -> InterruptDescriptorTable {
    let mut idt = storage.build(cpu);

    Pics::REMAPPED.remap(ports);
    if pit_hz != 0 {
        pit::set_frequency(ports, pit_hz);
    }

    idt.register_handler(
        cpu,
        TIMER_VECTOR,
        handlers.timer,
        GateAttributes::KERNEL_INTERRUPT,
    );
    idt.register_handler(
        cpu,
        EXCEPTION_BREAKPOINT,
        handlers.breakpoint,
        GateAttributes::KERNEL_TRAP,
    );
    idt.register_handler(
        cpu,
        EXCEPTION_OVERFLOW,
        handlers.overflow,
        GateAttributes::KERNEL_TRAP,
    );
    idt
}

/// Raises vectors 3 and 4 through the table, refusing if a gate is absent.
pub fn run_smoke_test<C: Privileged>(idt: &InterruptDescriptorTable, cpu: &C) -> BootResult {
    for vector in [EXCEPTION_BREAKPOINT, EXCEPTION_OVERFLOW] {
        if !idt.is_present(vector) {
            return Err(BootError::VectorNotPresent(vector));
        }
    }
    // SAFETY: both gates are present and point at trampoline stubs.
    unsafe {
        cpu.raise::<EXCEPTION_BREAKPOINT>();
        cpu.raise::<EXCEPTION_OVERFLOW>();
    }
    Ok(())
}

struct BootContext {
    cmdline: *const c_char,
    config: BootConfig,
    console: &'static IrqMutex<Console<VgaTextBuffer>>,
    handlers: HandlerSet,
    idt: Option<InterruptDescriptorTable>,
    ports: HwPorts,
    cpu: X86Cpu,
}

struct BootStep {
    name: &'static str,
    run: fn(&mut BootContext) -> BootResult,
}

impl BootStep {
    const fn new(name: &'static str, run: fn(&mut BootContext) -> BootResult) -> Self {
        Self { name, run }
    }
}

const BOOT_STEPS: &[BootStep] = &[
    BootStep::new("serial", boot_step_serial_init),
    BootStep::new("boot config", boot_step_boot_config),
    BootStep::new("console", boot_step_console),
    BootStep::new("interrupts", boot_step_interrupts),
    BootStep::new("smoke test", boot_step_smoke_test),
    BootStep::new("enable interrupts", boot_step_enable_interrupts),
    BootStep::new("keyboard poll", boot_step_keyboard_poll),
];

fn boot_step_serial_init(_ctx: &mut BootContext) -> BootResult {
    klog_init();
    serial::init();
    klog_attach_sink(serial::write_bytes);
    klog_debug!("Serial console ready on COM1");
    Ok(())
}

fn boot_step_boot_config(ctx: &mut BootContext) -> BootResult {
    // SAFETY: `boot_kernel`'s caller vouches for the pointer.
    let cmdline = unsafe { cmdline_from_ptr(ctx.cmdline) };
    ctx.config = config_from_cmdline(cmdline);
    if let Some(level) = ctx.config.log_level {
        klog_set_level(level);
    }
    klog_debug!("Boot option: {:?}", ctx.config);
    Ok(())
}

fn boot_step_console(ctx: &mut BootContext) -> BootResult {
    let mut console = ctx.console.lock();
    console.init_with(ctx.config.console_attribute());
    console.write_string(GREETING);
    Ok(())
}

fn boot_step_interrupts(ctx: &mut BootContext) -> BootResult {
    let storage = claim_table(ctx.config.idt_placement)?;
    let saved = ctx.cpu.save_and_disable_interrupts();
    let idt = install_interrupts(
        storage,
        &ctx.ports,
        &ctx.cpu,
        &ctx.handlers,
        ctx.config.pit_hz,
    );
    ctx.cpu.restore_interrupts(saved);
    ctx.idt = Some(idt);
    Ok(())
}

fn boot_step_smoke_test(ctx: &mut BootContext) -> BootResult {
    if !ctx.config.smoke_test {
        return Ok(());
    }
    let idt = ctx
        .idt
        .as_ref()
        .ok_or(BootError::VectorNotPresent(EXCEPTION_BREAKPOINT))?;
    run_smoke_test(idt, &ctx.cpu)
}

fn boot_step_enable_interrupts(ctx: &mut BootContext) -> BootResult {
    ctx.cpu.enable_interrupts();
    klog_info!("Interrupts enabled");
    Ok(())
}

fn boot_step_keyboard_poll(ctx: &mut BootContext) -> BootResult {
    if !ctx.config.keyboard_poll {
        return Ok(());
    }
    match KeyboardPoller::new(&ctx.ports).poll_once(&mut ctx.console) {
        Ok(read) => klog_debug!("Keyboard poll read {} bytes", read),
        Err(err) => klog_warn!("Keyboard poll skipped: {}", err),
    }
    Ok(())
}

/// Config from a decoded command line. An undecodable one is logged and
/// replaced by the defaults.
fn config_from_cmdline(cmdline: Result<Option<&str>, ConfigError>) -> BootConfig {
    match cmdline {
        Ok(cmdline) => BootConfig::from_cmdline(cmdline.unwrap_or_default()),
        Err(err) => {
            klog_warn!("boot: ignoring command line: {}", err);
            BootConfig::DEFAULT
        }
    }
}

/// Runs the boot steps and idles. Never returns.
///
/// # Safety
/// Must be called once, in ring 0, by the loader handoff. `cmdline` follows
/// the contract of [`cmdline_from_ptr`]. `handlers` must be trampoline stubs.
pub unsafe fn boot_kernel(
    cmdline: *const c_char,
    handlers: HandlerSet,
    console: &'static IrqMutex<Console<VgaTextBuffer>>,
) -> ! {
    let mut ctx = BootContext {
        cmdline,
        config: BootConfig::DEFAULT,
        console,
        handlers,
        idt: None,
        // SAFETY: ring 0, single core, per the caller's contract.
        ports: unsafe { HwPorts::new() },
        cpu: unsafe { X86Cpu::new() },
    };

    for step in BOOT_STEPS {
        klog_debug!("[boot:init] step -> {}", step.name);
        if let Err(err) = (step.run)(&mut ctx) {
            kernel_panic_args(format_args!("boot step '{}' failed: {}", step.name, err));
        }
    }

    if klog_is_enabled(KlogLevel::Info) {
        klog_info!("=== KERNEL BOOT SUCCESSFUL ===");
    }
    cpu::halt_loop()
}
