/*
 *  display/driver.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Paged display driver: buffer, cursor, font and transport in one owner
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

use std::convert::Infallible;

use display_interface::WriteOnlyDataCommand;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::info;

use crate::config::DriverKind;
use crate::display::cmd::Cmd;
use crate::display::error::DisplayError;
use crate::display::fill::{Rect, RectFiller};
use crate::display::font::{FixedFont, GlyphSource, FONT_6X8};
use crate::display::glyph::{Cursor, GlyphRenderer};
use crate::display::page_buffer::{PageBuffer, OFF, ON};
use crate::display::traits::{Display, DisplayCapabilities};
use crate::display::transport::{FlushSummary, PageTransport};

/// Driver for page-addressed monochrome controllers (SSD1306, SH1106).
///
/// Exists only after a successful bring-up; there is no uninitialized
/// state to guard against.
pub struct PagedDisplay<DI, F = FixedFont> {
    transport: PageTransport<DI>,
    buffer: PageBuffer,
    cursor: Cursor,
    font: F,
    capabilities: DisplayCapabilities,
    last_flush: FlushSummary,
}

impl<DI: WriteOnlyDataCommand> PagedDisplay<DI, FixedFont> {
    /// Bring up a panel of the controller's default size with the 6x8 font.
    pub fn new(interface: DI, kind: DriverKind) -> Result<Self, DisplayError> {
        let (width, height) = kind.default_size();
        Self::with_size(interface, kind, width, height)
    }

    pub fn with_size(interface: DI, kind: DriverKind, width: u32, height: u32) -> Result<Self, DisplayError> {
        Self::with_font(interface, kind, width, height, FONT_6X8)
    }
}

impl<DI: WriteOnlyDataCommand, F: GlyphSource> PagedDisplay<DI, F> {
    /// Bring up the controller and return a cleared driver
    ///
    /// # Arguments
    ///
    /// * `interface` - Command/data capability, e.g. an `I2cInterface`
    /// * `kind` - Controller variant; selects the bring-up sequence and page addressing
    /// * `width`, `height` - Panel geometry in pixels
    /// * `font` - Fixed-width glyph source
    ///
    /// # Returns
    ///
    /// The ready driver, or an error if the geometry is unusable or the
    /// bring-up transaction failed. Nothing is retried.
    pub fn with_font(
        interface: DI,
        kind: DriverKind,
        width: u32,
        height: u32,
        font: F,
    ) -> Result<Self, DisplayError> {
        let buffer = PageBuffer::new(width, height)?;
        let glyph_width = font.glyph_width();
        if glyph_width == 0 || glyph_width > buffer.width() {
            return Err(DisplayError::InvalidConfiguration(format!(
                "glyph width {} does not fit a {} pixel line",
                glyph_width, width
            )));
        }

        info!("Initializing {} ({}x{})", kind.name(), width, height);

        let mut transport = PageTransport::new(interface, kind);
        transport.bring_up(kind.init_sequence())?;

        let capabilities = DisplayCapabilities {
            width,
            height,
            page_count: buffer.page_count(),
            glyph_width,
            driver: kind,
        };

        let mut display = Self {
            transport,
            buffer,
            cursor: Cursor::default(),
            font,
            capabilities,
            last_flush: FlushSummary::default(),
        };
        display.clear();

        info!("{} initialized successfully ({}x{})", kind.name(), width, height);
        Ok(display)
    }

    pub fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    pub fn kind(&self) -> DriverKind {
        self.transport.kind()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn buffer(&self) -> &PageBuffer {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = Cursor::default();
    }

    pub fn print_char(&mut self, c: char) {
        GlyphRenderer::new(&mut self.buffer, &mut self.cursor, &self.font).render_char(c);
    }

    pub fn print(&mut self, text: &str) {
        GlyphRenderer::new(&mut self.buffer, &mut self.cursor, &self.font).render_str(text);
    }

    pub fn println(&mut self, text: &str) {
        let mut renderer = GlyphRenderer::new(&mut self.buffer, &mut self.cursor, &self.font);
        renderer.render_str(text);
        renderer.render_char('\n');
    }

    pub fn set_cursor(&mut self, x: u32, y: u32) {
        self.cursor = Cursor::from_pixels(x, y, self.buffer.width(), self.buffer.page_count());
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: BinaryColor) {
        RectFiller::new(&mut self.buffer).fill(Rect::new(x, y, w, h), color);
    }

    /// Whole screen on or off with a byte memset; the cursor stays put.
    pub fn fill_screen(&mut self, color: BinaryColor) {
        self.buffer.fill(if color.is_on() { ON } else { OFF });
    }

    /// Send the dirty pages. Failures are logged and retried next time.
    pub fn flush(&mut self) {
        self.last_flush = self.transport.flush(&mut self.buffer);
    }

    /// Pages sent and pages left dirty by the most recent flush
    pub fn last_flush(&self) -> FlushSummary {
        self.last_flush
    }

    pub fn display(&mut self) {
        self.flush();
    }

    pub fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        self.transport.command(&[Cmd::SET_CONTRAST, level])
    }

    pub fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        let op = if inverted { Cmd::DISPLAY_INVERTED } else { Cmd::DISPLAY_NORMAL };
        self.transport.command(&[op])
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        let op = if on { Cmd::DISPLAY_ON } else { Cmd::DISPLAY_OFF };
        self.transport.command(&[op])
    }

    /// Drop the driver state and hand back the bus interface
    pub fn release(self) -> DI {
        self.transport.release()
    }
}

impl<DI, F> Display for PagedDisplay<DI, F>
where
    DI: WriteOnlyDataCommand + Send,
    F: GlyphSource + Send,
{
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn clear(&mut self) {
        PagedDisplay::clear(self);
    }

    fn print_char(&mut self, c: char) {
        PagedDisplay::print_char(self, c);
    }

    fn print(&mut self, text: &str) {
        PagedDisplay::print(self, text);
    }

    fn set_cursor(&mut self, x: u32, y: u32) {
        PagedDisplay::set_cursor(self, x, y);
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: BinaryColor) {
        PagedDisplay::fill_rect(self, x, y, w, h, color);
    }

    fn flush(&mut self) {
        PagedDisplay::flush(self);
    }

    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        PagedDisplay::set_contrast(self, level)
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        PagedDisplay::set_invert(self, inverted)
    }

    fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        PagedDisplay::set_display_on(self, on)
    }

    fn page_buffer(&self) -> &PageBuffer {
        &self.buffer
    }
}

impl<DI, F> OriginDimensions for PagedDisplay<DI, F> {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

impl<DI: WriteOnlyDataCommand, F: GlyphSource> DrawTarget for PagedDisplay<DI, F> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // negative coordinates are off-screen; set_pixel clips the rest
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.buffer.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_screen(color);
        Ok(())
    }
}
