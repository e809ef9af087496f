/*
 *  display/font.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed-width column fonts
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

/// Source of fixed-width glyphs, one byte per column (bit 0 = top row).
pub trait GlyphSource {
    /// Columns per glyph, constant for the whole font
    fn glyph_width(&self) -> usize;

    /// Column bytes for `c`, or `None` when the font has no glyph for it
    fn glyph(&self, c: char) -> Option<&[u8]>;
}

/// A fixed-width font backed by a flat table covering `first..=last`.
///
/// Glyph `c` lives at `(c - first) * width` in the table.
#[derive(Debug, Clone, Copy)]
pub struct FixedFont {
    width: usize,
    first: u8,
    last: u8,
    data: &'static [u8],
}

impl FixedFont {
    pub const fn new(width: usize, first: u8, last: u8, data: &'static [u8]) -> Self {
        Self { width, first, last, data }
    }

    /// Printable range covered by this font
    pub fn range(&self) -> core::ops::RangeInclusive<char> {
        char::from(self.first)..=char::from(self.last)
    }
}

impl GlyphSource for FixedFont {
    fn glyph_width(&self) -> usize {
        self.width
    }

    fn glyph(&self, c: char) -> Option<&[u8]> {
        if !self.range().contains(&c) {
            return None;
        }
        let start = (c as usize - self.first as usize) * self.width;
        self.data.get(start..start + self.width)
    }
}

/// 6x8 ASCII font, `' '..='~'`
pub const FONT_6X8: FixedFont = FixedFont::new(6, b' ', b'~', &FONT_6X8_DATA);

#[rustfmt::skip]
const FONT_6X8_DATA: [u8; 95 * 6] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // space
    0x00, 0x00, 0x00, 0x2f, 0x00, 0x00, // !
    0x00, 0x00, 0x07, 0x00, 0x07, 0x00, // "
    0x00, 0x14, 0x7f, 0x14, 0x7f, 0x14, // #
    0x00, 0x24, 0x2a, 0x7f, 0x2a, 0x12, // $
    0x00, 0x62, 0x64, 0x08, 0x13, 0x23, // %
    0x00, 0x36, 0x49, 0x55, 0x22, 0x50, // &
    0x00, 0x00, 0x05, 0x03, 0x00, 0x00, // quote
    0x00, 0x00, 0x1c, 0x22, 0x41, 0x00, // (
    0x00, 0x00, 0x41, 0x22, 0x1c, 0x00, // )
    0x00, 0x14, 0x08, 0x3e, 0x08, 0x14, // *
    0x00, 0x08, 0x08, 0x3e, 0x08, 0x08, // +
    0x00, 0x00, 0x00, 0xa0, 0x60, 0x00, // ,
    0x00, 0x08, 0x08, 0x08, 0x08, 0x08, // -
    0x00, 0x00, 0x60, 0x60, 0x00, 0x00, // .
    0x00, 0x20, 0x10, 0x08, 0x04, 0x02, // /
    0x00, 0x3e, 0x51, 0x49, 0x45, 0x3e, // 0
    0x00, 0x00, 0x42, 0x7f, 0x40, 0x00, // 1
    0x00, 0x42, 0x61, 0x51, 0x49, 0x46, // 2
    0x00, 0x21, 0x41, 0x45, 0x4b, 0x31, // 3
    0x00, 0x18, 0x14, 0x12, 0x7f, 0x10, // 4
    0x00, 0x27, 0x45, 0x45, 0x45, 0x39, // 5
    0x00, 0x3c, 0x4a, 0x49, 0x49, 0x30, // 6
    0x00, 0x01, 0x71, 0x09, 0x05, 0x03, // 7
    0x00, 0x36, 0x49, 0x49, 0x49, 0x36, // 8
    0x00, 0x06, 0x49, 0x49, 0x29, 0x1e, // 9
    0x00, 0x00, 0x36, 0x36, 0x00, 0x00, // :
    0x00, 0x00, 0x56, 0x36, 0x00, 0x00, // ;
    0x00, 0x08, 0x14, 0x22, 0x41, 0x00, // <
    0x00, 0x14, 0x14, 0x14, 0x14, 0x14, // =
    0x00, 0x00, 0x41, 0x22, 0x14, 0x08, // >
    0x00, 0x02, 0x01, 0x51, 0x09, 0x06, // ?
    0x00, 0x32, 0x49, 0x59, 0x51, 0x3e, // @
    0x00, 0x7c, 0x12, 0x11, 0x12, 0x7c, // A
    0x00, 0x7f, 0x49, 0x49, 0x49, 0x36, // B
    0x00, 0x3e, 0x41, 0x41, 0x41, 0x22, // C
    0x00, 0x7f, 0x41, 0x41, 0x22, 0x1c, // D
    0x00, 0x7f, 0x49, 0x49, 0x49, 0x41, // E
    0x00, 0x7f, 0x09, 0x09, 0x09, 0x01, // F
    0x00, 0x3e, 0x41, 0x49, 0x49, 0x7a, // G
    0x00, 0x7f, 0x08, 0x08, 0x08, 0x7f, // H
    0x00, 0x00, 0x41, 0x7f, 0x41, 0x00, // I
    0x00, 0x20, 0x40, 0x41, 0x3f, 0x01, // J
    0x00, 0x7f, 0x08, 0x14, 0x22, 0x41, // K
    0x00, 0x7f, 0x40, 0x40, 0x40, 0x40, // L
    0x00, 0x7f, 0x02, 0x0c, 0x02, 0x7f, // M
    0x00, 0x7f, 0x04, 0x08, 0x10, 0x7f, // N
    0x00, 0x3e, 0x41, 0x41, 0x41, 0x3e, // O
    0x00, 0x7f, 0x09, 0x09, 0x09, 0x06, // P
    0x00, 0x3e, 0x41, 0x51, 0x21, 0x5e, // Q
    0x00, 0x7f, 0x09, 0x19, 0x29, 0x46, // R
    0x00, 0x46, 0x49, 0x49, 0x49, 0x31, // S
    0x00, 0x01, 0x01, 0x7f, 0x01, 0x01, // T
    0x00, 0x3f, 0x40, 0x40, 0x40, 0x3f, // U
    0x00, 0x1f, 0x20, 0x40, 0x20, 0x1f, // V
    0x00, 0x3f, 0x40, 0x38, 0x40, 0x3f, // W
    0x00, 0x63, 0x14, 0x08, 0x14, 0x63, // X
    0x00, 0x07, 0x08, 0x70, 0x08, 0x07, // Y
    0x00, 0x61, 0x51, 0x49, 0x45, 0x43, // Z
    0x00, 0x00, 0x7f, 0x41, 0x41, 0x00, // [
    0x00, 0x02, 0x04, 0x08, 0x10, 0x20, // backslash
    0x00, 0x00, 0x41, 0x41, 0x7f, 0x00, // ]
    0x00, 0x04, 0x02, 0x01, 0x02, 0x04, // ^
    0x00, 0x40, 0x40, 0x40, 0x40, 0x40, // _
    0x00, 0x00, 0x01, 0x02, 0x04, 0x00, // `
    0x00, 0x20, 0x54, 0x54, 0x54, 0x78, // a
    0x00, 0x7f, 0x48, 0x44, 0x44, 0x38, // b
    0x00, 0x38, 0x44, 0x44, 0x44, 0x20, // c
    0x00, 0x38, 0x44, 0x44, 0x48, 0x7f, // d
    0x00, 0x38, 0x54, 0x54, 0x54, 0x18, // e
    0x00, 0x08, 0x7e, 0x09, 0x01, 0x02, // f
    0x00, 0x18, 0xa4, 0xa4, 0xa4, 0x7c, // g
    0x00, 0x7f, 0x08, 0x04, 0x04, 0x78, // h
    0x00, 0x00, 0x44, 0x7d, 0x40, 0x00, // i
    0x00, 0x40, 0x80, 0x84, 0x7d, 0x00, // j
    0x00, 0x7f, 0x10, 0x28, 0x44, 0x00, // k
    0x00, 0x00, 0x41, 0x7f, 0x40, 0x00, // l
    0x00, 0x7c, 0x04, 0x18, 0x04, 0x78, // m
    0x00, 0x7c, 0x08, 0x04, 0x04, 0x78, // n
    0x00, 0x38, 0x44, 0x44, 0x44, 0x38, // o
    0x00, 0xfc, 0x24, 0x24, 0x24, 0x18, // p
    0x00, 0x18, 0x24, 0x24, 0x18, 0xfc, // q
    0x00, 0x7c, 0x08, 0x04, 0x04, 0x08, // r
    0x00, 0x48, 0x54, 0x54, 0x54, 0x20, // s
    0x00, 0x04, 0x3f, 0x44, 0x40, 0x20, // t
    0x00, 0x3c, 0x40, 0x40, 0x20, 0x7c, // u
    0x00, 0x1c, 0x20, 0x40, 0x20, 0x1c, // v
    0x00, 0x3c, 0x40, 0x30, 0x40, 0x3c, // w
    0x00, 0x44, 0x28, 0x10, 0x28, 0x44, // x
    0x00, 0x1c, 0xa0, 0xa0, 0xa0, 0x7c, // y
    0x00, 0x44, 0x64, 0x54, 0x4c, 0x44, // z
    0x00, 0x08, 0x36, 0x41, 0x41, 0x00, // {
    0x00, 0x00, 0x00, 0x7f, 0x00, 0x00, // |
    0x00, 0x00, 0x41, 0x41, 0x36, 0x08, // }
    0x00, 0x08, 0x04, 0x08, 0x10, 0x08, // ~
];
