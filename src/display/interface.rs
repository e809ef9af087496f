/*
 *  display/interface.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  I2C command/data interface with control byte framing
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

use std::time::{Duration, Instant};

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, warn};

use crate::display::cmd::ControlByte;

/// Factory default 7-bit address of SSD1306/SH1106 modules (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Per-transaction deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10);

/// Fast-mode plus
pub const DEFAULT_SPEED_HZ: u32 = 1_000_000;

/// Frames every transaction as `[control byte, payload...]` and writes it
/// to the controller's address in one I2C write.
///
/// Linux i2c-dev cannot abort a transfer in flight, so the deadline is
/// checked after the write returns: a late write is reported as failed and
/// the caller retries it.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
    timeout: Duration,
    speed_hz: u32,
    frame: Vec<u8>,
}

impl<I2C: I2c> I2cInterface<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            timeout: DEFAULT_TIMEOUT,
            speed_hz: DEFAULT_SPEED_HZ,
            frame: Vec::with_capacity(129),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bus clock is set by the adapter (device tree on a Pi); recorded so it
    /// shows up in the logs next to the address.
    pub fn speed_hz(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn transact(&mut self, control: ControlByte, payload: DataFormat<'_>) -> Result<(), DisplayError> {
        self.frame.clear();
        self.frame.push(control.value());
        match payload {
            DataFormat::U8(bytes) => self.frame.extend_from_slice(bytes),
            DataFormat::U8Iter(iter) => self.frame.extend(iter),
            _ => return Err(DisplayError::DataFormatNotImplemented),
        }

        let started = Instant::now();
        let result = self.i2c.write(self.address, &self.frame);
        let elapsed = started.elapsed();

        if let Err(e) = result {
            debug!(
                "i2c write of {} bytes to 0x{:02X} failed: {:?}",
                self.frame.len(),
                self.address,
                e.kind()
            );
            return Err(DisplayError::BusWriteError);
        }
        if elapsed > self.timeout {
            warn!(
                "i2c write to 0x{:02X} took {:?} (limit {:?} at {} Hz)",
                self.address, elapsed, self.timeout, self.speed_hz
            );
            return Err(DisplayError::BusWriteError);
        }
        Ok(())
    }
}

impl<I2C: I2c> WriteOnlyDataCommand for I2cInterface<I2C> {
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        self.transact(ControlByte::CommandStream, cmd)
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        self.transact(ControlByte::DataStream, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Records every write; optionally fails or stalls.
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
        stall: Option<Duration>,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            if let Some(stall) = self.stall {
                std::thread::sleep(stall);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_commands_are_framed_with_stream_control_byte() {
        let mut iface = I2cInterface::new(RecordingBus::default());
        iface.send_commands(DataFormat::U8(&[0xB3])).unwrap();

        let bus = iface.release();
        assert_eq!(bus.writes, vec![(0x3C, vec![0x00, 0xB3])]);
    }

    #[test]
    fn test_data_is_framed_with_data_control_byte() {
        let mut iface = I2cInterface::with_address(RecordingBus::default(), 0x3D);
        let mut bytes = [0xAAu8, 0x55].into_iter();
        iface.send_data(DataFormat::U8Iter(&mut bytes)).unwrap();

        let bus = iface.release();
        assert_eq!(bus.writes, vec![(0x3D, vec![0x40, 0xAA, 0x55])]);
    }

    #[test]
    fn test_wide_formats_are_rejected() {
        let mut iface = I2cInterface::new(RecordingBus::default());
        let mut words = [0x1234u16];
        let err = iface.send_data(DataFormat::U16BE(&mut words)).unwrap_err();
        assert!(matches!(err, DisplayError::DataFormatNotImplemented));
    }

    #[test]
    fn test_bus_error_maps_to_write_error() {
        let bus = RecordingBus { fail: true, ..Default::default() };
        let mut iface = I2cInterface::new(bus);
        let err = iface.send_commands(DataFormat::U8(&[0xAF])).unwrap_err();
        assert!(matches!(err, DisplayError::BusWriteError));
    }

    #[test]
    fn test_late_write_is_reported_as_failure() {
        let bus = RecordingBus { stall: Some(Duration::from_millis(20)), ..Default::default() };
        let mut iface = I2cInterface::new(bus).timeout(Duration::from_millis(1));
        let err = iface.send_data(DataFormat::U8(&[0x00])).unwrap_err();
        assert!(matches!(err, DisplayError::BusWriteError));
    }
}
