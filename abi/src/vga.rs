//! VGA text mode cell encoding.
//!
//! The text buffer is 80x25 16-bit cells, row-major. A cell holds the glyph in
//! the low byte and the colour attribute in the high byte; the attribute packs
//! the foreground in the low nibble and the background in the high nibble.

/// Linear address of the colour text buffer.
pub const VGA_TEXT_BUFFER: usize = 0xB8000;

pub const VGA_WIDTH: usize = 80;
pub const VGA_HEIGHT: usize = 25;
pub const VGA_CELLS: usize = VGA_WIDTH * VGA_HEIGHT;

/// The sixteen text mode colours.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGrey = 7,
    DarkGrey = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightMagenta = 13,
    LightBrown = 14,
    White = 15,
}

impl Color {
    const ALL: [Color; 16] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Brown,
        Color::LightGrey,
        Color::DarkGrey,
        Color::LightBlue,
        Color::LightGreen,
        Color::LightCyan,
        Color::LightRed,
        Color::LightMagenta,
        Color::LightBrown,
        Color::White,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Case-insensitive lookup by name (`light_grey`, `lightgrey`, `white`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: [&str; 16] = [
            "black",
            "blue",
            "green",
            "cyan",
            "red",
            "magenta",
            "brown",
            "lightgrey",
            "darkgrey",
            "lightblue",
            "lightgreen",
            "lightcyan",
            "lightred",
            "lightmagenta",
            "lightbrown",
            "white",
        ];
        let mut folded = [0u8; 16];
        let mut len = 0;
        for b in name.bytes().filter(|b| *b != b'_' && *b != b'-') {
            if len == folded.len() {
                return None;
            }
            folded[len] = b.to_ascii_lowercase();
            len += 1;
        }
        let folded = &folded[..len];
        NAMES
            .iter()
            .position(|n| n.as_bytes() == folded)
            .and_then(|i| Self::from_index(i as u8))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Colour attribute byte: `fg | bg << 4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    /// Light grey on black.
    pub const DEFAULT: Self = Self::new(Color::LightGrey, Color::Black);

    #[inline]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self(fg as u8 | (bg as u8) << 4)
    }

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn foreground(self) -> u8 {
        self.0 & 0x0F
    }

    #[inline]
    pub const fn background(self) -> u8 {
        self.0 >> 4
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One text buffer cell: `glyph | attribute << 8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct GlyphCell(u16);

impl GlyphCell {
    #[inline]
    pub const fn new(glyph: u8, attribute: ColorCode) -> Self {
        Self(glyph as u16 | (attribute.bits() as u16) << 8)
    }

    #[inline]
    pub const fn blank(attribute: ColorCode) -> Self {
        Self::new(b' ', attribute)
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn glyph(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub const fn attribute(self) -> ColorCode {
        ColorCode((self.0 >> 8) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_packs_foreground_low() {
        for fg in 0..16u8 {
            for bg in 0..16u8 {
                let fgc = Color::from_index(fg).unwrap();
                let bgc = Color::from_index(bg).unwrap();
                let code = ColorCode::new(fgc, bgc);
                assert_eq!(code.bits(), fg | (bg << 4));
                assert_eq!(code.foreground(), fg);
                assert_eq!(code.background(), bg);
            }
        }
        assert_eq!(ColorCode::DEFAULT.bits(), 0x07);
    }

    #[test]
    fn cell_packs_glyph_low() {
        let attr = ColorCode::new(Color::White, Color::Blue);
        let cell = GlyphCell::new(b'A', attr);
        assert_eq!(cell.bits(), 0x1F41);
        assert_eq!(cell.glyph(), b'A');
        assert_eq!(cell.attribute(), attr);
        assert_eq!(GlyphCell::blank(ColorCode::DEFAULT).bits(), 0x0720);
    }

    #[test]
    fn color_lookup() {
        assert_eq!(Color::from_index(16), None);
        assert_eq!(Color::from_name("light_grey"), Some(Color::LightGrey));
        assert_eq!(Color::from_name("WHITE"), Some(Color::White));
        assert_eq!(Color::from_name("light-brown"), Some(Color::LightBrown));
        assert_eq!(Color::from_name("chartreuse"), None);
        assert_eq!(Color::from_name("averyveryverylongname"), None);
    }
}
