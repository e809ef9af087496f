/*
 *  display/transport.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page-addressed write protocol: bring-up and dirty page streaming
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

use display_interface::{DataFormat, WriteOnlyDataCommand};
use log::{debug, trace, warn};

use crate::config::DriverKind;
use crate::display::cmd::{encode_init_sequence, InitStep};
use crate::display::error::DisplayError;
use crate::display::page_buffer::PageBuffer;

/// Outcome of one flush, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Pages that reached the panel and are clean now
    pub sent: usize,
    /// Pages whose transactions failed; still dirty
    pub failed: usize,
}

/// Speaks the controller's page-addressed protocol over a
/// command/data capability.
pub struct PageTransport<DI> {
    interface: DI,
    kind: DriverKind,
    // reused between pages, at most three address bytes
    address_cmd: Vec<u8>,
}

impl<DI: WriteOnlyDataCommand> PageTransport<DI> {
    pub fn new(interface: DI, kind: DriverKind) -> Self {
        Self { interface, kind, address_cmd: Vec::with_capacity(3) }
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    /// Send the whole bring-up sequence as one command-stream transaction.
    pub fn bring_up(&mut self, steps: &[InitStep]) -> Result<(), DisplayError> {
        for step in steps {
            debug!("init step: {:?}", step);
        }
        let bytes = encode_init_sequence(steps);
        self.interface.send_commands(DataFormat::U8(&bytes)).map_err(|e| {
            DisplayError::InitializationFailed(format!(
                "{} bring-up sequence rejected: {:?}",
                self.kind.name(),
                e
            ))
        })
    }

    /// Send a short command sequence outside the page protocol.
    pub fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_commands(DataFormat::U8(bytes))?;
        Ok(())
    }

    /// Stream every dirty page, lowest page first.
    ///
    /// A page goes out as two transactions: the page-address command, then
    /// exactly one page of column bytes. Its dirty flag is cleared only when
    /// both succeed; otherwise it stays dirty for the next flush.
    pub fn flush(&mut self, buffer: &mut PageBuffer) -> FlushSummary {
        let mut summary = FlushSummary::default();

        for page in 0..buffer.page_count() {
            if !buffer.is_dirty(page) {
                continue;
            }

            self.address_cmd.clear();
            self.kind.page_address_commands(page, buffer.width(), &mut self.address_cmd);

            let result = match buffer.page(page) {
                Some(strip) => self
                    .interface
                    .send_commands(DataFormat::U8(&self.address_cmd))
                    .and_then(|()| self.interface.send_data(DataFormat::U8(strip.bytes()))),
                None => continue,
            };

            match result {
                Ok(()) => {
                    trace!("page {} flushed", page);
                    buffer.mark_clean(page);
                    summary.sent += 1;
                }
                Err(e) => {
                    warn!("page {} not flushed, keeping it dirty: {:?}", page, e);
                    summary.failed += 1;
                }
            }
        }

        debug!("flush: {} pages sent, {} still dirty", summary.sent, summary.failed);
        summary
    }

    /// Hand back the bus capability
    pub fn release(self) -> DI {
        self.interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::{MockInterface, Transaction};

    fn clean_buffer() -> PageBuffer {
        let mut buffer = PageBuffer::new(128, 64).unwrap();
        for page in 0..buffer.page_count() {
            buffer.mark_clean(page);
        }
        buffer
    }

    #[test]
    fn test_bring_up_is_one_command_transaction() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Ssd1306);

        transport.bring_up(DriverKind::Ssd1306.init_sequence()).unwrap();

        assert_eq!(
            mock.transactions(),
            vec![Transaction::Commands(vec![0x8D, 0x14, 0x81, 0xFF, 0xAF])]
        );
    }

    #[test]
    fn test_bring_up_failure() {
        let mock = MockInterface::new();
        mock.fail_commands(true);
        let mut transport = PageTransport::new(mock, DriverKind::Ssd1306);

        let err = transport.bring_up(DriverKind::Ssd1306.init_sequence()).unwrap_err();
        assert!(matches!(err, DisplayError::InitializationFailed(_)));
    }

    #[test]
    fn test_only_dirty_pages_in_ascending_order() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Ssd1306);
        let mut buffer = clean_buffer();
        buffer.write_columns(5, 0, &[0x11]);
        buffer.write_columns(2, 127, &[0x22]);

        let summary = transport.flush(&mut buffer);

        assert_eq!(summary, FlushSummary { sent: 2, failed: 0 });
        let tx = mock.transactions();
        assert_eq!(tx.len(), 4);
        assert_eq!(tx[0], Transaction::Commands(vec![0xB2]));
        assert_eq!(tx[1], Transaction::Data(buffer.page(2).unwrap().bytes().to_vec()));
        assert_eq!(tx[2], Transaction::Commands(vec![0xB5]));
        match &tx[3] {
            Transaction::Data(bytes) => {
                assert_eq!(bytes.len(), 128);
                assert_eq!(bytes[0], 0x11);
            }
            other => panic!("expected data, got {:?}", other),
        }
        assert_eq!(buffer.dirty_pages().count(), 0);
    }

    #[test]
    fn test_clean_buffer_sends_nothing() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Ssd1306);
        let mut buffer = clean_buffer();

        assert_eq!(transport.flush(&mut buffer), FlushSummary::default());
        assert!(mock.transactions().is_empty());
    }

    #[test]
    fn test_failed_data_keeps_page_dirty_and_retries() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Ssd1306);
        let mut buffer = clean_buffer();
        buffer.mark_dirty(0);
        buffer.mark_dirty(3);

        mock.fail_data(true);
        let summary = transport.flush(&mut buffer);
        assert_eq!(summary, FlushSummary { sent: 0, failed: 2 });
        assert_eq!(buffer.dirty_pages().collect::<Vec<_>>(), vec![0, 3]);

        mock.fail_data(false);
        mock.take_transactions();
        let summary = transport.flush(&mut buffer);
        assert_eq!(summary, FlushSummary { sent: 2, failed: 0 });
        assert_eq!(mock.transactions().len(), 4);
        assert_eq!(buffer.dirty_pages().count(), 0);
    }

    #[test]
    fn test_failed_address_skips_data() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Ssd1306);
        let mut buffer = clean_buffer();
        buffer.mark_dirty(1);

        mock.fail_commands(true);
        transport.flush(&mut buffer);

        assert!(mock.transactions().is_empty());
        assert!(buffer.is_dirty(1));
    }

    #[test]
    fn test_narrow_ssd1306_restarts_every_page_at_column_zero() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Ssd1306);
        let mut buffer = PageBuffer::new(64, 48).unwrap();

        transport.flush(&mut buffer);

        let tx = mock.transactions();
        assert_eq!(tx.len(), 12);
        for (page, pair) in tx.chunks(2).enumerate() {
            assert_eq!(pair[0], Transaction::Commands(vec![0xB0 | page as u8, 0x00, 0x10]));
            assert_eq!(pair[1].bytes().len(), 64);
        }
    }

    #[test]
    fn test_sh1106_addresses_column_offset() {
        let mock = MockInterface::new();
        let mut transport = PageTransport::new(mock.clone(), DriverKind::Sh1106);
        let mut buffer = clean_buffer();
        buffer.mark_dirty(4);

        transport.flush(&mut buffer);

        assert_eq!(mock.transactions()[0], Transaction::Commands(vec![0xB4, 0x02, 0x10]));
    }
}
