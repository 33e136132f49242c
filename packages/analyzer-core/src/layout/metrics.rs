//! Font metrics for measuring rendered string widths.

use super::win_ansi::printed_byte;

/// Measures the rendered width of a string in page units.
pub trait FontMetrics {
    fn text_width(&self, text: &str) -> f32;
}

impl<F: Fn(&str) -> f32> FontMetrics for F {
    fn text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Every character has the same advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monospace {
    pub advance: f32,
}

impl Monospace {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl FontMetrics for Monospace {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}

/// Standard Type 1 Helvetica at `size` points, WinAnsi encoded.
///
/// Characters are measured as the byte the report writer prints for them,
/// so a character without a glyph measures as `?`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helvetica {
    pub size: f32,
}

impl Helvetica {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// Advance of `ch` in 1/1000 em.
    pub fn glyph_width(ch: char) -> u16 {
        Self::byte_width(printed_byte(ch))
    }

    /// Advance of WinAnsi byte `byte` in 1/1000 em.
    pub fn byte_width(byte: u8) -> u16 {
        match byte {
            32..=126 => HELVETICA_WIDTHS[(byte - 32) as usize],
            128..=255 => HELVETICA_HIGH_WIDTHS[(byte - 128) as usize],
            _ => UNDEFINED_WIDTH,
        }
    }
}

impl FontMetrics for Helvetica {
    fn text_width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| Self::glyph_width(c) as u32).sum();
        units as f32 * self.size / 1000.0
    }
}

/// Width charged for codes with no glyph; never printed.
const UNDEFINED_WIDTH: u16 = 556;

// Advance widths for ' ' (32) through '~' (126).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' - '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' - 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' - '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' - 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p' - '~'
];

// Advance widths for WinAnsi 0x80 through 0xFF; unassigned codes use 556.
#[rustfmt::skip]
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 556, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556, // 0x80
    556, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 556, 500, 667,  // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,    // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,    // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,   // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,    // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,    // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,    // 0xF0
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_counts_chars() {
        let mono = Monospace::new(2.0);
        assert_eq!(mono.text_width("abc"), 6.0);
        assert_eq!(mono.text_width("é"), 2.0);
        assert_eq!(mono.text_width(""), 0.0);
    }

    #[test]
    fn test_helvetica_widths() {
        assert_eq!(Helvetica::glyph_width(' '), 278);
        assert_eq!(Helvetica::glyph_width('W'), 944);
        assert_eq!(Helvetica::glyph_width('i'), 222);
        assert_eq!(Helvetica::glyph_width('~'), 584);
        assert_eq!(Helvetica::glyph_width('€'), 556);
    }

    #[test]
    fn test_helvetica_winansi_widths() {
        assert_eq!(Helvetica::glyph_width('—'), 1000);
        assert_eq!(Helvetica::glyph_width('…'), 1000);
        assert_eq!(Helvetica::glyph_width('Æ'), 1000);
        assert_eq!(Helvetica::glyph_width('•'), 350);
        assert_eq!(Helvetica::glyph_width('’'), 222);
        assert_eq!(Helvetica::glyph_width('“'), 333);
        assert_eq!(Helvetica::glyph_width('Š'), 667);
        assert_eq!(Helvetica::glyph_width('è'), 556);
        // Printed as '?' and ' '.
        assert_eq!(Helvetica::glyph_width('日'), Helvetica::glyph_width('?'));
        assert_eq!(Helvetica::glyph_width('\t'), Helvetica::glyph_width(' '));

        let font = Helvetica::new(10.0);
        // "Hi" = 722 + 222
        assert!((font.text_width("Hi") - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_closure_metrics() {
        let metric = |s: &str| s.len() as f32;
        assert_eq!(metric.text_width("four"), 4.0);
    }
}
