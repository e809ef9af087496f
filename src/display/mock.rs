/*
 *  display/mock.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording command/data interface for running without hardware
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

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};

/// One bus transaction as the controller would see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Commands(Vec<u8>),
    Data(Vec<u8>),
}

impl Transaction {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Transaction::Commands(bytes) | Transaction::Data(bytes) => bytes,
        }
    }
}

/// Shared state, inspectable from tests while the driver owns a clone
#[derive(Debug, Default)]
pub struct MockInterfaceState {
    /// Every accepted transaction, oldest first
    pub transactions: Vec<Transaction>,

    /// Reject command transactions
    pub fail_commands: bool,

    /// Reject data transactions
    pub fail_data: bool,
}

/// Command/data interface that records instead of writing.
///
/// Clones share state, so keep one clone and hand the other to the driver.
/// Rejected transactions are not recorded.
#[derive(Debug, Clone, Default)]
pub struct MockInterface {
    state: Arc<Mutex<MockInterfaceState>>,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<Mutex<MockInterfaceState>> {
        Arc::clone(&self.state)
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    /// Drain the recorded transactions
    pub fn take_transactions(&self) -> Vec<Transaction> {
        std::mem::take(&mut self.lock().transactions)
    }

    pub fn fail_commands(&self, fail: bool) {
        self.lock().fail_commands = fail;
    }

    pub fn fail_data(&self, fail: bool) {
        self.lock().fail_data = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MockInterfaceState> {
        // a panicking test thread must not hide the record from the others
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn collect(format: DataFormat<'_>) -> Result<Vec<u8>, DisplayError> {
        match format {
            DataFormat::U8(bytes) => Ok(bytes.to_vec()),
            DataFormat::U8Iter(iter) => Ok(iter.collect()),
            _ => Err(DisplayError::DataFormatNotImplemented),
        }
    }
}

impl WriteOnlyDataCommand for MockInterface {
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        let bytes = Self::collect(cmd)?;
        let mut state = self.lock();
        if state.fail_commands {
            return Err(DisplayError::BusWriteError);
        }
        state.transactions.push(Transaction::Commands(bytes));
        Ok(())
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        let bytes = Self::collect(buf)?;
        let mut state = self.lock();
        if state.fail_data {
            return Err(DisplayError::BusWriteError);
        }
        state.transactions.push(Transaction::Data(bytes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_record() {
        let mock = MockInterface::new();
        let mut handle = mock.clone();

        handle.send_commands(DataFormat::U8(&[0xAF])).unwrap();
        handle.send_data(DataFormat::U8(&[1, 2])).unwrap();

        assert_eq!(
            mock.transactions(),
            vec![Transaction::Commands(vec![0xAF]), Transaction::Data(vec![1, 2])]
        );
        assert_eq!(mock.take_transactions().len(), 2);
        assert!(mock.transactions().is_empty());
    }

    #[test]
    fn test_failures_are_not_recorded() {
        let mock = MockInterface::new();
        let mut handle = mock.clone();
        mock.fail_data(true);

        assert!(handle.send_data(DataFormat::U8(&[0])).is_err());
        assert!(handle.send_commands(DataFormat::U8(&[0xB0])).is_ok());
        assert_eq!(mock.transactions(), vec![Transaction::Commands(vec![0xB0])]);
        assert!(mock.state().lock().unwrap().fail_data);
    }
}
