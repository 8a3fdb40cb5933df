//! Atomic one-shot and in-progress flags.
//!
//! `InitFlag` tracks whether a one-shot resource (the IDT storage, the serial
//! port) has been claimed. `StateFlag` tracks an operation that is currently
//! running, such as panic handling.
//!
//! Claims use `SeqCst` swaps; `is_set`/`is_active` use `Acquire` so side
//! effects published before `mark_set` are visible to the reader.

use core::sync::atomic::{AtomicBool, Ordering};

/// Monotonic "has this happened" flag.
#[repr(transparent)]
pub struct InitFlag {
    flag: AtomicBool,
}

impl InitFlag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Returns `true` for exactly one caller: the one that flipped the flag.
    #[inline]
    pub fn claim(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn mark_set(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl Default for InitFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// "Is this happening right now" flag.
#[repr(transparent)]
pub struct StateFlag {
    flag: AtomicBool,
}

impl StateFlag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Returns `true` if this call entered the state, `false` if it was
    /// already active.
    #[inline]
    pub fn enter(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn leave(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Default for StateFlag {
    fn default() -> Self {
        Self::new()
    }
}
