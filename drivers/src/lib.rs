#![no_std]
#![forbid(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod console;
pub mod hw;
pub mod keyboard;
pub mod pic;
pub mod pit;
pub mod serial;
pub mod timer;

pub use console::{CellBuffer, Console, TextSink, VgaTextBuffer};
pub use keyboard::KeyboardPoller;
pub use pic::Pics;
pub use timer::TimerHandler;
