/*
 *  lib.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
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

//! Paged framebuffer driver for SSD1306/SH1106 class OLED panels.
//!
//! Drawing goes into an in-memory mirror organized in 8-pixel pages; only
//! pages that changed since the last flush are sent over the bus.

pub mod config;
pub mod display;

pub use config::DriverKind;
pub use display::{Display, PagedDisplay};
