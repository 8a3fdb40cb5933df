use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use crate::cpu;

/// Spin mutex that keeps interrupts disabled while held.
///
/// State shared between normal code and an interrupt handler must live behind
/// one of these: the handler can never preempt a holder on the same CPU, so it
/// never spins on a lock that cannot be released.
pub struct IrqMutex<T> {
    inner: spin::Mutex<T>,
}

impl<T> IrqMutex<T> {
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
        }
    }

    #[inline]
    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let saved_flags = cpu::read_flags();
        cpu::disable_interrupts();

        let inner = self.inner.lock();

        IrqMutexGuard {
            inner: ManuallyDrop::new(inner),
            saved_flags,
        }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<IrqMutexGuard<'_, T>> {
        let saved_flags = cpu::read_flags();
        cpu::disable_interrupts();

        match self.inner.try_lock() {
            Some(inner) => Some(IrqMutexGuard {
                inner: ManuallyDrop::new(inner),
                saved_flags,
            }),
            None => {
                if saved_flags & cpu::INTERRUPT_FLAG != 0 {
                    cpu::enable_interrupts();
                }
                None
            }
        }
    }
}

pub struct IrqMutexGuard<'a, T> {
    inner: ManuallyDrop<spin::MutexGuard<'a, T>>,
    saved_flags: usize,
}

impl<'a, T> Deref for IrqMutexGuard<'a, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<'a, T> DerefMut for IrqMutexGuard<'a, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<'a, T> Drop for IrqMutexGuard<'a, T> {
    #[inline]
    fn drop(&mut self) {
        // Unlock before IF comes back, or a pending IRQ would spin on us.
        unsafe { ManuallyDrop::drop(&mut self.inner) };
        if self.saved_flags & cpu::INTERRUPT_FLAG != 0 {
            cpu::enable_interrupts();
        }
    }
}
