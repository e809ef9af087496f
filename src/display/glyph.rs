/*
 *  display/glyph.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text cursor and glyph blitting into the page buffer
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

use log::trace;

use crate::display::font::GlyphSource;
use crate::display::page_buffer::{PageBuffer, PAGE_HEIGHT};

/// Next glyph position: a column and a page (text line).
///
/// Always within `0..width` and `0..page_count`; both wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub column: usize,
    pub page: usize,
}

impl Cursor {
    pub fn new(column: usize, page: usize) -> Self {
        Self { column, page }
    }

    /// Position from pixel coordinates; `y` snaps down to its page.
    pub fn from_pixels(x: u32, y: u32, width: usize, page_count: usize) -> Self {
        Self {
            column: x as usize % width,
            page: (y as usize / PAGE_HEIGHT) % page_count,
        }
    }
}

/// Blits glyphs at the cursor and moves it along.
pub struct GlyphRenderer<'a, F: GlyphSource> {
    buffer: &'a mut PageBuffer,
    cursor: &'a mut Cursor,
    font: &'a F,
}

impl<'a, F: GlyphSource> GlyphRenderer<'a, F> {
    pub fn new(buffer: &'a mut PageBuffer, cursor: &'a mut Cursor, font: &'a F) -> Self {
        Self { buffer, cursor, font }
    }

    /// Draw one character and advance the cursor.
    ///
    /// `'\n'` pushes the cursor to the next line. Characters without a glyph
    /// are not drawn but still take up a cell, so layout stays predictable.
    pub fn render_char(&mut self, c: char) {
        let width = self.buffer.width();
        let glyph_width = self.font.glyph_width();

        if c == '\n' {
            self.cursor.column = width;
        } else if let Some(glyph) = self.font.glyph(c) {
            self.buffer.write_columns(self.cursor.page, self.cursor.column, glyph);
        } else {
            trace!("no glyph for {:?}, skipping cell", c);
        }

        self.cursor.column += glyph_width;
        if self.cursor.column > width.saturating_sub(glyph_width) {
            self.cursor.column = 0;
            self.cursor.page = (self.cursor.page + 1) % self.buffer.page_count();
        }
    }

    /// Render left to right, stopping early at a NUL.
    pub fn render_str(&mut self, text: &str) {
        for c in text.chars().take_while(|&c| c != '\0') {
            self.render_char(c);
        }
    }
}
