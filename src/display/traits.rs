/*
 *  display/traits.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display capability trait shared by all controller backends
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

use embedded_graphics::pixelcolor::BinaryColor;

use crate::config::DriverKind;
use crate::display::error::DisplayError;
use crate::display::page_buffer::PageBuffer;

/// Display geometry and metadata, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Number of 8-pixel pages (text lines)
    pub page_count: usize,

    /// Columns taken by one character cell
    pub glyph_width: usize,

    /// Controller behind the bus
    pub driver: DriverKind,
}

impl DisplayCapabilities {
    /// Character cells that fit on one line before the cursor wraps
    pub fn chars_per_line(&self) -> usize {
        if self.glyph_width == 0 {
            return 0;
        }
        self.width as usize / self.glyph_width
    }
}

/// What every backend offers to consumers.
///
/// Drawing only touches the in-memory mirror; nothing reaches the panel
/// until `flush()`. Drawing and flushing never fail from the caller's point
/// of view: bad coordinates are clipped or wrapped, and pages that could not
/// be sent stay dirty for the next flush.
pub trait Display: Send {
    fn capabilities(&self) -> &DisplayCapabilities;

    fn width(&self) -> u32 {
        self.capabilities().width
    }

    fn height(&self) -> u32 {
        self.capabilities().height
    }

    /// All pixels off, every page dirty, cursor home.
    fn clear(&mut self);

    /// Render one character at the cursor and advance it.
    fn print_char(&mut self, c: char);

    /// Render a string, stopping at the first NUL.
    fn print(&mut self, text: &str) {
        for c in text.chars().take_while(|&c| c != '\0') {
            self.print_char(c);
        }
    }

    fn println(&mut self, text: &str) {
        self.print(text);
        self.print_char('\n');
    }

    /// Move the cursor; `y` snaps down to its page.
    fn set_cursor(&mut self, x: u32, y: u32);

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: BinaryColor);

    /// Send the dirty pages to the panel.
    fn flush(&mut self);

    fn display(&mut self) {
        self.flush();
    }

    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError>;

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError>;

    fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Read-only view of the mirror, for previews and tests
    fn page_buffer(&self) -> &PageBuffer;
}
