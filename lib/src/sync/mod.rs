//! Locks that are safe to take from interrupt handlers.

mod irq_mutex;

pub use irq_mutex::{IrqMutex, IrqMutexGuard};
