/*
 *  display/page_buffer.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page-organized bitmap mirror of the panel with per-page dirty tracking
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

use crate::display::error::DisplayError;

/// Pixel rows held by one page (one bit each per column byte)
pub const PAGE_HEIGHT: usize = 8;

/// Column byte value with every pixel off
pub const OFF: u8 = 0x00;

/// Column byte value with every pixel on
pub const ON: u8 = 0xFF;

/// Most pages the page-address command can reach
pub const MAX_PAGES: usize = 8;

/// Widest window the supported controllers expose
pub const MAX_WIDTH: usize = 128;

/// One 8-pixel-high strip of the display.
///
/// Byte `n` is column `n`; bit 0 is the top row of the strip.
#[derive(Debug, Clone)]
pub struct Page {
    columns: Vec<u8>,
    dirty: bool,
}

impl Page {
    fn new(width: usize) -> Self {
        Self { columns: vec![OFF; width], dirty: true }
    }

    /// Column bytes exactly as they go over the wire
    pub fn bytes(&self) -> &[u8] {
        &self.columns
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// In-memory mirror of the panel.
///
/// The dirty flag of a page is the only thing the transport consults:
/// every mutation sets it, only a successful flush of that page clears it.
///
/// Index policy: page indices wrap modulo the page count, columns at or
/// beyond the width are clipped. Nothing ever spills into a neighbouring
/// page.
#[derive(Debug, Clone)]
pub struct PageBuffer {
    pages: Vec<Page>,
    width: usize,
}

impl PageBuffer {
    /// Allocate a buffer for a `width` x `height` panel, all pixels off and
    /// every page dirty.
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        let (w, h) = (width as usize, height as usize);
        if w == 0
            || w > MAX_WIDTH
            || h == 0
            || h % PAGE_HEIGHT != 0
            || h / PAGE_HEIGHT > MAX_PAGES
        {
            return Err(DisplayError::UnsupportedGeometry { width, height });
        }

        let pages = (0..h / PAGE_HEIGHT).map(|_| Page::new(w)).collect();
        Ok(Self { pages, width: w })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.pages.len() * PAGE_HEIGHT
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pixels off, every page dirty. Nothing else is reset.
    pub fn clear(&mut self) {
        self.fill(OFF);
    }

    /// Byte-level memset of every page; the fast path for full-screen fills.
    pub fn fill(&mut self, value: u8) {
        for page in &mut self.pages {
            page.columns.fill(value);
            page.dirty = true;
        }
    }

    /// OR `mask` into the column byte when `set`, AND out its inverse
    /// otherwise, and mark the page dirty.
    pub fn set_column_bits(&mut self, page: usize, column: usize, mask: u8, set: bool) {
        let page = self.wrap_page(page);
        let strip = &mut self.pages[page];
        if let Some(byte) = strip.columns.get_mut(column) {
            if set {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
        strip.dirty = true;
    }

    /// Copy `bytes` into consecutive columns starting at `column`, clipped at
    /// the right edge. The page is marked dirty unconditionally.
    pub fn write_columns(&mut self, page: usize, column: usize, bytes: &[u8]) {
        let page = self.wrap_page(page);
        let strip = &mut self.pages[page];
        if column < strip.columns.len() {
            let end = (column + bytes.len()).min(strip.columns.len());
            strip.columns[column..end].copy_from_slice(&bytes[..end - column]);
        }
        strip.dirty = true;
    }

    /// Set or clear the single pixel at (`x`, `y`); out-of-range coordinates
    /// are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width && y < self.height() {
            self.set_column_bits(y / PAGE_HEIGHT, x, 1 << (y % PAGE_HEIGHT), on);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        let byte = self.column(y / PAGE_HEIGHT, x)?;
        Some(byte & (1 << (y % PAGE_HEIGHT)) != 0)
    }

    /// Column byte at (`page`, `column`), no wrapping
    pub fn column(&self, page: usize, column: usize) -> Option<u8> {
        self.pages.get(page)?.columns.get(column).copied()
    }

    pub fn page(&self, page: usize) -> Option<&Page> {
        self.pages.get(page)
    }

    pub fn mark_dirty(&mut self, page: usize) {
        let page = self.wrap_page(page);
        self.pages[page].dirty = true;
    }

    /// Only the transport calls this, after the page reached the panel.
    pub(crate) fn mark_clean(&mut self, page: usize) {
        if let Some(strip) = self.pages.get_mut(page) {
            strip.dirty = false;
        }
    }

    pub fn is_dirty(&self, page: usize) -> bool {
        self.pages.get(page).is_some_and(Page::is_dirty)
    }

    /// Indices of the dirty pages in ascending order
    pub fn dirty_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.dirty)
            .map(|(idx, _)| idx)
    }

    /// Render the buffer as text, one line per pixel row ('#' on, '.' off).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height());
        for y in 0..self.height() {
            for x in 0..self.width {
                out.push(if self.pixel(x, y) == Some(true) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    #[inline]
    fn wrap_page(&self, page: usize) -> usize {
        page % self.pages.len()
    }
}
