//! VGA text console.
//!
//! Writes glyphs into the 80x25 text buffer at a software cursor. There is no
//! control-character handling: every byte, `\n` included, becomes one cell.
//! Reaching the end of a row moves to the next; reaching the end of the
//! screen moves back to the top-left cell and overwrites what is there.
//!
//! The cell storage is abstracted by [`CellBuffer`] so the cursor logic runs
//! against a plain array in unit tests.

use core::fmt;
use core::ptr;

use ember_abi::vga::{ColorCode, GlyphCell, VGA_CELLS, VGA_HEIGHT, VGA_WIDTH};
use ember_lib::IrqMutex;

/// Backing store for `VGA_CELLS` text cells, row-major.
pub trait CellBuffer {
    fn write_cell(&mut self, index: usize, cell: GlyphCell);

    fn read_cell(&self, index: usize) -> GlyphCell;
}

impl CellBuffer for [u16; VGA_CELLS] {
    #[inline]
    fn write_cell(&mut self, index: usize, cell: GlyphCell) {
        self[index] = cell.bits();
    }

    #[inline]
    fn read_cell(&self, index: usize) -> GlyphCell {
        GlyphCell::from_bits(self[index])
    }
}

/// The memory-mapped text buffer.
pub struct VgaTextBuffer {
    base: *mut u16,
}

// SAFETY: the buffer is plain MMIO memory; exclusive access is provided by
// whoever owns the `Console`.
unsafe impl Send for VgaTextBuffer {}

impl VgaTextBuffer {
    /// # Safety
    /// `address` must be the identity-mapped base of a colour text buffer of
    /// at least `VGA_CELLS` cells, and only one `VgaTextBuffer` may exist.
    pub const unsafe fn at(address: usize) -> Self {
        Self {
            base: address as *mut u16,
        }
    }
}

impl CellBuffer for VgaTextBuffer {
    #[inline]
    fn write_cell(&mut self, index: usize, cell: GlyphCell) {
        debug_assert!(index < VGA_CELLS);
        unsafe { ptr::write_volatile(self.base.add(index), cell.bits()) }
    }

    #[inline]
    fn read_cell(&self, index: usize) -> GlyphCell {
        debug_assert!(index < VGA_CELLS);
        GlyphCell::from_bits(unsafe { ptr::read_volatile(self.base.add(index)) })
    }
}

/// Text console over a cell buffer.
pub struct Console<B: CellBuffer> {
    buffer: B,
    row: usize,
    column: usize,
    attribute: ColorCode,
}

impl<B: CellBuffer> Console<B> {
    /// Wraps `buffer` without touching it. Call [`Console::init`] before use.
    pub const fn new(buffer: B) -> Self {
        Self {
            buffer,
            row: 0,
            column: 0,
            attribute: ColorCode::DEFAULT,
        }
    }

    /// Resets to light grey on black and blanks the screen.
    pub fn init(&mut self) {
        self.init_with(ColorCode::DEFAULT);
    }

    /// Homes the cursor, selects `attribute` and fills every cell with a
    /// space in that attribute.
    pub fn init_with(&mut self, attribute: ColorCode) {
        self.row = 0;
        self.column = 0;
        self.attribute = attribute;
        let blank = GlyphCell::blank(attribute);
        for index in 0..VGA_CELLS {
            self.buffer.write_cell(index, blank);
        }
    }

    /// Attribute for subsequent writes. Existing cells keep theirs.
    pub fn set_color(&mut self, attribute: ColorCode) {
        self.attribute = attribute;
    }

    pub fn color(&self) -> ColorCode {
        self.attribute
    }

    pub fn put_char(&mut self, c: u8) {
        let index = self.row * VGA_WIDTH + self.column;
        self.buffer.write_cell(index, GlyphCell::new(c, self.attribute));
        self.column += 1;
        if self.column == VGA_WIDTH {
            self.column = 0;
            self.row += 1;
            if self.row == VGA_HEIGHT {
                self.row = 0;
            }
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put_char(b);
        }
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// `(row, column)` of the next cell to be written.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.column)
    }

    pub fn cell(&self, row: usize, column: usize) -> GlyphCell {
        self.buffer.read_cell(row * VGA_WIDTH + column)
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }
}

impl<B: CellBuffer> fmt::Write for Console<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}

/// Destination for handler output.
pub trait TextSink {
    fn put_bytes(&mut self, bytes: &[u8]);
}

impl<B: CellBuffer> TextSink for Console<B> {
    fn put_bytes(&mut self, bytes: &[u8]) {
        self.write_bytes(bytes);
    }
}

/// A console shared with interrupt handlers. Each call holds the lock for the
/// whole byte run, so runs never interleave mid-way.
impl<B: CellBuffer> TextSink for &IrqMutex<Console<B>> {
    fn put_bytes(&mut self, bytes: &[u8]) {
        self.lock().write_bytes(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_abi::vga::Color;

    fn console() -> Console<[u16; VGA_CELLS]> {
        let mut c = Console::new([0xFFFF; VGA_CELLS]);
        c.init();
        c
    }

    #[test]
    fn init_blanks_every_cell() {
        let c = console();
        assert_eq!(c.cursor(), (0, 0));
        assert_eq!(c.color(), ColorCode::DEFAULT);
        assert!(c.buffer().iter().all(|&cell| cell == 0x0720));
    }

    #[test]
    fn init_with_uses_requested_attribute() {
        let mut c = Console::new([0; VGA_CELLS]);
        let attr = ColorCode::new(Color::White, Color::Blue);
        c.init_with(attr);
        assert!(c.buffer().iter().all(|&cell| cell == 0x1F20));
    }

    #[test]
    fn put_char_writes_and_advances() {
        let mut c = console();
        c.put_char(b'H');
        c.put_char(b'i');
        assert_eq!(c.cell(0, 0), GlyphCell::new(b'H', ColorCode::DEFAULT));
        assert_eq!(c.cell(0, 1).glyph(), b'i');
        assert_eq!(c.cursor(), (0, 2));
    }

    #[test]
    fn full_row_wraps_to_next_row() {
        let mut c = console();
        let row: std::vec::Vec<u8> = (0..VGA_WIDTH).map(|i| b'!' + i as u8).collect();
        c.write_bytes(&row);
        assert_eq!(c.cursor(), (1, 0));
        for (col, &glyph) in row.iter().enumerate() {
            assert_eq!(c.cell(0, col), GlyphCell::new(glyph, ColorCode::DEFAULT));
        }
        assert_eq!(c.cell(1, 0), GlyphCell::blank(ColorCode::DEFAULT));
    }

    #[test]
    fn full_screen_wraps_to_origin_and_overwrites() {
        let mut c = console();
        c.write_bytes(&[b'a'; VGA_CELLS]);
        assert_eq!(c.cursor(), (0, 0));
        c.put_char(b'b');
        assert_eq!(c.cell(0, 0).glyph(), b'b');
        assert_eq!(c.cell(0, 1).glyph(), b'a');
        assert_eq!(c.cursor(), (0, 1));
    }

    #[test]
    fn newline_is_an_ordinary_glyph() {
        let mut c = console();
        c.write_string("a\nb");
        assert_eq!(c.cell(0, 1).glyph(), b'\n');
        assert_eq!(c.cursor(), (0, 3));
    }

    #[test]
    fn set_color_only_affects_later_cells() {
        let mut c = console();
        c.put_char(b'1');
        let red = ColorCode::new(Color::LightRed, Color::Black);
        c.set_color(red);
        c.put_char(b'2');
        assert_eq!(c.cell(0, 0).attribute(), ColorCode::DEFAULT);
        assert_eq!(c.cell(0, 1).attribute(), red);
        assert_eq!(c.cell(0, 2).attribute(), ColorCode::DEFAULT);
    }

    #[test]
    fn greeting_lands_on_first_row() {
        let mut c = console();
        c.write_string("Hello, kernel World!\n");
        assert_eq!(c.cursor(), (0, 21));
        let row: std::vec::Vec<u8> = (0..21).map(|col| c.cell(0, col).glyph()).collect();
        assert_eq!(row, b"Hello, kernel World!\n");
    }
}
