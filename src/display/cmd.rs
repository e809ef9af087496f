/*
 *  display/cmd.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Controller opcodes, bus control bytes and bring-up sequences
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

use crate::config::DriverKind;
use crate::display::page_buffer::MAX_WIDTH;

/// Controller opcodes shared by the SSD1306 and SH1106
pub struct Cmd;

impl Cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_NORMAL: u8 = 0xA6;
    pub const DISPLAY_INVERTED: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    /// OR'ed with the page index (0..=7)
    pub const SET_PAGE_ADDRESS: u8 = 0xB0;
    /// OR'ed with the low nibble of the column
    pub const SET_LOW_COLUMN: u8 = 0x00;
    /// OR'ed with the high nibble of the column
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    /// SSD1306 charge pump, follow with 0x14 (enable)
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    /// SH1106 DC-DC converter, follow with 0x8B (enable)
    pub const SET_DC_DC: u8 = 0xAD;
}

/// Operands for the commands above
pub struct Flag;

impl Flag {
    pub const CHARGE_PUMP_ENABLE: u8 = 0x14;
    pub const DC_DC_ENABLE: u8 = 0x8B;
    pub const CONTRAST_MAX: u8 = 0xFF;
}

/// First byte of every I2C write, selecting how the controller
/// interprets the rest of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlByte {
    /// One command byte follows, then another control byte.
    /// Unused by the transport, which always streams; kept for the full table.
    CommandSingle = 0x80,
    /// All following bytes are commands
    CommandStream = 0x00,
    /// All following bytes are display RAM data
    DataStream = 0x40,
}

impl ControlByte {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// One step of a controller bring-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Bare opcode
    Cmd(u8),
    /// Opcode followed by a single operand
    CmdArg(u8, u8),
}

/// SSD1306: enable charge pump, contrast to max, display on
pub const SSD1306_INIT_SEQUENCE: &[InitStep] = &[
    InitStep::CmdArg(Cmd::SET_CHARGE_PUMP, Flag::CHARGE_PUMP_ENABLE),
    InitStep::CmdArg(Cmd::SET_CONTRAST, Flag::CONTRAST_MAX),
    InitStep::Cmd(Cmd::DISPLAY_ON),
];

/// SH1106: enable DC-DC, contrast to max, display on
pub const SH1106_INIT_SEQUENCE: &[InitStep] = &[
    InitStep::CmdArg(Cmd::SET_DC_DC, Flag::DC_DC_ENABLE),
    InitStep::CmdArg(Cmd::SET_CONTRAST, Flag::CONTRAST_MAX),
    InitStep::Cmd(Cmd::DISPLAY_ON),
];

/// Flatten a bring-up sequence into the byte stream of one
/// command-stream transaction.
pub fn encode_init_sequence(steps: &[InitStep]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(steps.len() * 2);
    for step in steps {
        match *step {
            InitStep::Cmd(op) => bytes.push(op),
            InitStep::CmdArg(op, arg) => bytes.extend_from_slice(&[op, arg]),
        }
    }
    bytes
}

impl DriverKind {
    /// Bring-up sequence sent once at construction
    pub fn init_sequence(&self) -> &'static [InitStep] {
        match self {
            DriverKind::Ssd1306 => SSD1306_INIT_SEQUENCE,
            DriverKind::Sh1106 => SH1106_INIT_SEQUENCE,
        }
    }

    /// Panel size used when the configuration leaves it open
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            DriverKind::Ssd1306 => (128, 64),
            DriverKind::Sh1106 => (128, 64),
        }
    }

    /// First RAM column of the visible window
    pub fn column_offset(&self) -> u8 {
        match self {
            DriverKind::Ssd1306 => 0,
            // 132 column RAM, 128 column glass centered in it
            DriverKind::Sh1106 => 2,
        }
    }

    /// Append the commands that address `page` ahead of its data stream.
    ///
    /// The column pointer only wraps back to the start after the last RAM
    /// column, so it is repositioned whenever a page is narrower than RAM.
    pub fn page_address_commands(&self, page: usize, width: usize, out: &mut Vec<u8>) {
        out.push(Cmd::SET_PAGE_ADDRESS | (page as u8 & 0x07));
        let reposition = match self {
            DriverKind::Ssd1306 => width < MAX_WIDTH,
            // no horizontal addressing mode, reposition the column every page
            DriverKind::Sh1106 => true,
        };
        if reposition {
            let offset = self.column_offset();
            out.push(Cmd::SET_LOW_COLUMN | (offset & 0x0F));
            out.push(Cmd::SET_HIGH_COLUMN | (offset >> 4));
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DriverKind::Ssd1306 => "SSD1306",
            DriverKind::Sh1106 => "SH1106",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssd1306_bring_up_bytes() {
        let bytes = encode_init_sequence(DriverKind::Ssd1306.init_sequence());
        assert_eq!(bytes, vec![0x8D, 0x14, 0x81, 0xFF, 0xAF]);
    }

    #[test]
    fn test_sh1106_bring_up_bytes() {
        let bytes = encode_init_sequence(DriverKind::Sh1106.init_sequence());
        assert_eq!(bytes, vec![0xAD, 0x8B, 0x81, 0xFF, 0xAF]);
    }

    #[test]
    fn test_page_address_commands() {
        let mut out = Vec::new();
        DriverKind::Ssd1306.page_address_commands(5, 128, &mut out);
        assert_eq!(out, vec![0xB5]);

        out.clear();
        DriverKind::Sh1106.page_address_commands(7, 128, &mut out);
        assert_eq!(out, vec![0xB7, 0x02, 0x10]);
    }

    #[test]
    fn test_narrow_ssd1306_resets_column() {
        let mut out = Vec::new();
        DriverKind::Ssd1306.page_address_commands(2, 64, &mut out);
        assert_eq!(out, vec![0xB2, 0x00, 0x10]);
    }

    #[test]
    fn test_control_bytes() {
        assert_eq!(ControlByte::CommandSingle.value(), 0x80);
        assert_eq!(ControlByte::CommandStream.value(), 0x00);
        assert_eq!(ControlByte::DataStream.value(), 0x40);
    }
}
