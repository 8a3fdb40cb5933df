//! Legacy 8259 PIC pair.
//!
//! The BIOS leaves IRQ0-7 on vectors 0x08-0x0F, on top of the CPU exception
//! vectors. [`Pics::remap`] reprograms both controllers so the master serves
//! vectors 0x20-0x27 and the slave 0x28-0x2F.

use ember_abi::arch::Port;
use ember_abi::arch::x86::idt::{IRQ_BASE_MASTER, IRQ_BASE_SLAVE};
use ember_lib::{PortIo, klog_debug};

use crate::hw::pic_defs::{
    ICW1_INIT_ICW4, ICW3_MASTER_SLAVE_ON_IRQ2, ICW3_SLAVE_CASCADE_ID, ICW4_8086, PIC_EOI,
    PIC_LINES,
};

/// One controller of the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pic {
    command: Port,
    data: Port,
    base_vector: u8,
    cascade: u8,
}

impl Pic {
    /// Vectors `base_vector..base_vector + 8` belong to this controller.
    pub const fn handles(&self, vector: u8) -> bool {
        vector >= self.base_vector && vector - self.base_vector < PIC_LINES
    }

    pub const fn base_vector(&self) -> u8 {
        self.base_vector
    }

    /// ICW1..ICW4, one write each, with a settle delay after every write.
    fn initialize<P: PortIo>(&self, ports: &P) {
        ports.write_u8(self.command, ICW1_INIT_ICW4);
        ports.io_wait();
        ports.write_u8(self.data, self.base_vector);
        ports.io_wait();
        ports.write_u8(self.data, self.cascade);
        ports.io_wait();
        ports.write_u8(self.data, ICW4_8086);
        ports.io_wait();
    }

    fn end_of_interrupt<P: PortIo>(&self, ports: &P) {
        ports.write_u8(self.command, PIC_EOI);
    }
}

/// Master and slave 8259.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pics {
    master: Pic,
    slave: Pic,
}

impl Pics {
    /// Master at 0x20, slave at 0x28.
    pub const REMAPPED: Self = Self::new(IRQ_BASE_MASTER, IRQ_BASE_SLAVE);

    pub const fn new(master_base: u8, slave_base: u8) -> Self {
        Self {
            master: Pic {
                command: Port::PIC1_COMMAND,
                data: Port::PIC1_DATA,
                base_vector: master_base,
                cascade: ICW3_MASTER_SLAVE_ON_IRQ2,
            },
            slave: Pic {
                command: Port::PIC2_COMMAND,
                data: Port::PIC2_DATA,
                base_vector: slave_base,
                cascade: ICW3_SLAVE_CASCADE_ID,
            },
        }
    }

    pub const fn master(&self) -> &Pic {
        &self.master
    }

    pub const fn slave(&self) -> &Pic {
        &self.slave
    }

    /// Runs the full initialisation sequence on the master, then the slave.
    ///
    /// ICW1 clears each interrupt mask register, so every line is unmasked
    /// afterwards. Interrupts must be disabled by the caller.
    pub fn remap<P: PortIo>(&self, ports: &P) {
        self.master.initialize(ports);
        self.slave.initialize(ports);
        klog_debug!(
            "PIC: remapped master to {:#04x}, slave to {:#04x}",
            self.master.base_vector,
            self.slave.base_vector
        );
    }

    /// Acknowledges both controllers regardless of which one raised the line.
    pub fn end_of_interrupt_all<P: PortIo>(&self, ports: &P) {
        self.master.end_of_interrupt(ports);
        self.slave.end_of_interrupt(ports);
    }

    /// Acknowledges only the controllers involved in `vector`: the master
    /// always, the slave too when it raised the line. Vectors outside both
    /// ranges are ignored.
    pub fn end_of_interrupt<P: PortIo>(&self, ports: &P, vector: u8) {
        if self.slave.handles(vector) {
            self.slave.end_of_interrupt(ports);
            self.master.end_of_interrupt(ports);
        } else if self.master.handles(vector) {
            self.master.end_of_interrupt(ports);
        }
    }
}
