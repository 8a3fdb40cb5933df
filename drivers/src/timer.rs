//! Timer tick handler.

use ember_lib::numfmt;

use crate::console::TextSink;

/// Printed before the tick counter on every tick.
pub const TICK_LABEL: &[u8] = b"interrupt handler";

/// Digits printed per tick; enough for any `u16`.
pub const TICK_DIGITS: usize = 5;

/// Per-tick work for IRQ0: bump a wrapping 16-bit counter and print it.
///
/// Runs in interrupt context. The owner keeps it behind an `IrqMutex` so the
/// counter is only ever touched with interrupts off.
pub struct TimerHandler {
    ticks: u16,
}

impl TimerHandler {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    pub fn ticks(&self) -> u16 {
        self.ticks
    }

    /// Writes `"interrupt handler"` and the new tick count as five decimal
    /// digits, most significant first, leading zeros kept.
    pub fn on_tick<S: TextSink>(&mut self, sink: &mut S) {
        self.ticks = self.ticks.wrapping_add(1);
        sink.put_bytes(TICK_LABEL);
        sink.put_bytes(&numfmt::decimal_fixed::<TICK_DIGITS>(self.ticks as u32));
    }
}

impl Default for TimerHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_abi::vga::VGA_CELLS;
    use std::vec::Vec;

    use crate::console::Console;

    struct Collect(Vec<u8>);

    impl TextSink for Collect {
        fn put_bytes(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes);
        }
    }

    #[test]
    fn first_tick_prints_label_and_one() {
        let mut timer = TimerHandler::new();
        let mut out = Collect(Vec::new());
        timer.on_tick(&mut out);
        assert_eq!(out.0, b"interrupt handler00001");
        assert_eq!(timer.ticks(), 1);
    }

    #[test]
    fn digits_track_counter() {
        let mut timer = TimerHandler::new();
        let mut out = Collect(Vec::new());
        for _ in 0..1234 {
            out.0.clear();
            timer.on_tick(&mut out);
        }
        assert_eq!(&out.0[TICK_LABEL.len()..], b"01234");
    }

    #[test]
    fn counter_wraps_at_sixteen_bits() {
        let mut timer = TimerHandler { ticks: u16::MAX - 1 };
        let mut out = Collect(Vec::new());
        timer.on_tick(&mut out);
        assert_eq!(&out.0[TICK_LABEL.len()..], b"65535");
        out.0.clear();
        timer.on_tick(&mut out);
        assert_eq!(timer.ticks(), 0);
        assert_eq!(&out.0[TICK_LABEL.len()..], b"00000");
    }

    #[test]
    fn tick_advances_console_by_twenty_two_cells() {
        let mut console = Console::new([0u16; VGA_CELLS]);
        console.init();
        let mut timer = TimerHandler::new();
        timer.on_tick(&mut console);
        assert_eq!(console.cursor(), (0, 22));
        assert_eq!(console.cell(0, 21).glyph(), b'1');
    }
}
