/*
 *  display/fill.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rectangle fill across page boundaries
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

use crate::display::page_buffer::{PageBuffer, PAGE_HEIGHT};

/// Half-open pixel rectangle `[x, x+w) x [y, y+h)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Sets or clears rectangular regions bit by bit.
///
/// Not very fast: one primitive call per pixel. Fine for status bars and
/// character cells; whole-screen fills belong to `PageBuffer::fill`.
pub struct RectFiller<'a> {
    buffer: &'a mut PageBuffer,
}

impl<'a> RectFiller<'a> {
    pub fn new(buffer: &'a mut PageBuffer) -> Self {
        Self { buffer }
    }

    /// Rows past the bottom wrap to the top pages, columns past the right
    /// edge are clipped. Every row marks its page dirty.
    pub fn fill(&mut self, rect: Rect, color: BinaryColor) {
        let set = color.is_on();
        let page_count = self.buffer.page_count();
        let x_start = rect.x as usize;
        let x_end = x_start.saturating_add(rect.w as usize).min(self.buffer.width());
        let y_start = rect.y as usize;
        // past one full screen the wrapped rows only repeat
        let rows = (rect.h as usize).min(self.buffer.height());
        let y_end = y_start.saturating_add(rows);

        for row in y_start..y_end {
            let page = (row / PAGE_HEIGHT) % page_count;
            let mask = 1u8 << (row % PAGE_HEIGHT);
            for column in x_start..x_end {
                self.buffer.set_column_bits(page, column, mask, set);
            }
            self.buffer.mark_dirty(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_buffer() -> PageBuffer {
        let mut buffer = PageBuffer::new(128, 64).unwrap();
        for page in 0..buffer.page_count() {
            buffer.mark_clean(page);
        }
        buffer
    }

    fn assert_rect(buffer: &PageBuffer, rect: Rect, expect: bool) {
        for y in 0..64 {
            for x in 0..128 {
                let inside = x >= rect.x && x < rect.x + rect.w && y >= rect.y && y < rect.y + rect.h;
                let pixel = buffer.pixel(x as usize, y as usize).unwrap();
                if inside {
                    assert_eq!(pixel, expect, "pixel ({}, {}) inside", x, y);
                } else {
                    assert!(!pixel, "pixel ({}, {}) outside was touched", x, y);
                }
            }
        }
    }

    #[test]
    fn test_fill_spanning_pages() {
        let mut buffer = clean_buffer();
        let rect = Rect::new(10, 5, 20, 14); // rows 5..19 -> pages 0, 1, 2

        RectFiller::new(&mut buffer).fill(rect, BinaryColor::On);

        assert_rect(&buffer, rect, true);
        assert_eq!(buffer.dirty_pages().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(buffer.column(0, 10), Some(0b1110_0000));
        assert_eq!(buffer.column(1, 29), Some(0xFF));
        assert_eq!(buffer.column(2, 10), Some(0b0000_0111));
    }

    #[test]
    fn test_clear_fill_and_idempotence() {
        let mut buffer = clean_buffer();
        let rect = Rect::new(0, 8, 6, 8);

        RectFiller::new(&mut buffer).fill(rect, BinaryColor::On);
        RectFiller::new(&mut buffer).fill(rect, BinaryColor::On);
        assert_rect(&buffer, rect, true);

        buffer.mark_clean(1);
        RectFiller::new(&mut buffer).fill(rect, BinaryColor::On);
        assert_rect(&buffer, rect, true);
        // dirty-setting is per call, not per change
        assert!(buffer.is_dirty(1));

        RectFiller::new(&mut buffer).fill(rect, BinaryColor::Off);
        assert!(buffer.page(1).unwrap().bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_columns_are_clipped_at_right_edge() {
        let mut buffer = clean_buffer();
        RectFiller::new(&mut buffer).fill(Rect::new(120, 0, 40, 1), BinaryColor::On);

        assert_rect(&buffer, Rect::new(120, 0, 8, 1), true);
        assert_eq!(buffer.dirty_pages().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_rows_wrap_to_top() {
        let mut buffer = clean_buffer();
        RectFiller::new(&mut buffer).fill(Rect::new(0, 63, 1, 2), BinaryColor::On);

        assert_eq!(buffer.pixel(0, 63), Some(true));
        assert_eq!(buffer.pixel(0, 0), Some(true));
        assert_eq!(buffer.dirty_pages().collect::<Vec<_>>(), vec![0, 7]);
    }

    #[test]
    fn test_tall_rect_stops_after_one_screen() {
        let mut buffer = clean_buffer();
        RectFiller::new(&mut buffer).fill(Rect::new(0, 0, 128, u32::MAX), BinaryColor::On);

        assert!((0..8).all(|page| buffer.page(page).unwrap().bytes().iter().all(|&b| b == 0xFF)));
        assert_eq!(buffer.dirty_pages().count(), 8);
    }

    #[test]
    fn test_tall_rect_from_lower_row_covers_every_row() {
        let mut buffer = clean_buffer();
        RectFiller::new(&mut buffer).fill(Rect::new(3, 41, 2, u32::MAX), BinaryColor::On);

        assert_rect(&buffer, Rect::new(3, 0, 2, 64), true);
        assert_eq!(buffer.dirty_pages().count(), 8);
    }

    #[test]
    fn test_empty_rect_touches_nothing() {
        let mut buffer = clean_buffer();
        RectFiller::new(&mut buffer).fill(Rect::new(4, 4, 0, 10), BinaryColor::On);
        assert!(buffer.page(0).unwrap().bytes().iter().all(|&b| b == 0));
        // rows were still visited
        assert_eq!(buffer.dirty_pages().collect::<Vec<_>>(), vec![0, 1]);

        let mut buffer = clean_buffer();
        RectFiller::new(&mut buffer).fill(Rect::new(4, 4, 10, 0), BinaryColor::On);
        assert_eq!(buffer.dirty_pages().count(), 0);
    }
}
