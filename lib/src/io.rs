//! x86 I/O port access.
//!
//! Drivers are written against [`PortIo`] so their register sequences can be
//! replayed against a recording fake. [`HwPorts`] is the real backend; holding
//! one is the capability to touch hardware, which is why creating it is unsafe.

use core::arch::asm;

use ember_abi::arch::Port;

#[inline(always)]
pub unsafe fn outb(port: u16, value: u8) {
    unsafe {
        asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
}

#[inline(always)]
pub unsafe fn inb(port: u16) -> u8 {
    let value: u8;
    unsafe {
        asm!(
            "in al, dx",
            out("al") value,
            in("dx") port,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}

/// Byte-wide port I/O.
pub trait PortIo {
    fn write_u8(&self, port: Port, value: u8);

    fn read_u8(&self, port: Port) -> u8;

    /// Short delay for devices that need time between command bytes.
    #[inline]
    fn io_wait(&self) {
        self.write_u8(Port::POST_DELAY, 0);
    }
}

impl<P: PortIo + ?Sized> PortIo for &P {
    #[inline]
    fn write_u8(&self, port: Port, value: u8) {
        (**self).write_u8(port, value)
    }

    #[inline]
    fn read_u8(&self, port: Port) -> u8 {
        (**self).read_u8(port)
    }

    #[inline]
    fn io_wait(&self) {
        (**self).io_wait()
    }
}

/// Real IN/OUT instructions.
#[derive(Clone, Copy, Debug)]
pub struct HwPorts {
    _private: (),
}

impl HwPorts {
    /// # Safety
    /// The caller must run with I/O privilege, and no other code may assume
    /// exclusive ownership of the ports written through this handle.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl PortIo for HwPorts {
    #[inline(always)]
    fn write_u8(&self, port: Port, value: u8) {
        unsafe { outb(port.number(), value) }
    }

    #[inline(always)]
    fn read_u8(&self, port: Port) -> u8 {
        unsafe { inb(port.number()) }
    }
}
