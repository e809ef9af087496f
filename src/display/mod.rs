/*
 *  display/mod.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - page buffer, glyphs, fills and the page transport
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod cmd;

// Paged framebuffer engine
pub mod page_buffer;
pub mod font;
pub mod glyph;
pub mod fill;
pub mod transport;

// Bus capabilities
pub mod interface;
pub mod mock;

pub mod driver;
pub mod factory;

// Re-exports for convenience
pub use traits::{Display, DisplayCapabilities};
pub use error::{DisplayError, DisplayFactoryError};
pub use page_buffer::{Page, PageBuffer};
pub use font::{FixedFont, GlyphSource, FONT_6X8};
pub use glyph::{Cursor, GlyphRenderer};
pub use fill::{Rect, RectFiller};
pub use transport::{FlushSummary, PageTransport};
pub use interface::I2cInterface;
pub use mock::{MockInterface, Transaction};
pub use driver::PagedDisplay;
pub use factory::{DisplayFactory, BoxedDisplay};
