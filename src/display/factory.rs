/*
 *  display/factory.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Builds a ready display from configuration
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

use log::info;

use crate::config::{BusConfig, DisplayConfig, DriverKind};
use crate::display::driver::PagedDisplay;
use crate::display::error::DisplayFactoryError;
use crate::display::mock::MockInterface;
use crate::display::page_buffer::{MAX_PAGES, MAX_WIDTH, PAGE_HEIGHT};
use crate::display::traits::Display;

/// Type alias for boxed display trait objects
pub type BoxedDisplay = Box<dyn Display>;

/// Factory for creating displays from configuration
pub struct DisplayFactory;

impl DisplayFactory {
    /// Create a display from configuration
    ///
    /// With `dry_run` the bus is a `MockInterface` and no hardware is
    /// touched; otherwise the I2C device named in the bus configuration is
    /// opened (needs the `linux-i2c` feature).
    ///
    /// # Returns
    ///
    /// A boxed, initialized display with contrast and inversion applied, or
    /// an error if the configuration is incomplete or bring-up failed.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = DisplayConfig {
    ///     driver: Some(DriverKind::Ssd1306),
    ///     bus: Some(BusConfig::default()),
    ///     ..Default::default()
    /// };
    ///
    /// let display = DisplayFactory::create_from_config(&config, false)?;
    /// ```
    pub fn create_from_config(
        config: &DisplayConfig,
        dry_run: bool,
    ) -> Result<BoxedDisplay, DisplayFactoryError> {
        let kind = config.driver.ok_or(DisplayFactoryError::NoDriverSpecified)?;

        // the mock needs no wiring
        if dry_run {
            info!("Dry run - recording {} traffic instead of writing it", kind.name());
            let display = Self::create_mock(config, MockInterface::new())?;
            return Ok(Box::new(display));
        }

        Self::validate_config(config)?;
        let bus = config.bus.as_ref().ok_or(DisplayFactoryError::NoBusConfiguration)?;
        Self::create_hardware(config, kind, bus)
    }

    /// Bring up a display on the given mock; keep a clone to inspect traffic.
    pub fn create_mock(
        config: &DisplayConfig,
        mock: MockInterface,
    ) -> Result<PagedDisplay<MockInterface>, DisplayFactoryError> {
        let kind = config.driver.ok_or(DisplayFactoryError::NoDriverSpecified)?;
        let (width, height) = config.resolved_size().unwrap_or_else(|| kind.default_size());
        let mut display = PagedDisplay::with_size(mock, kind, width, height)?;
        Self::apply_options(&mut display, config)?;
        Ok(display)
    }

    #[cfg(feature = "linux-i2c")]
    fn create_hardware(
        config: &DisplayConfig,
        kind: DriverKind,
        bus: &BusConfig,
    ) -> Result<BoxedDisplay, DisplayFactoryError> {
        use std::time::Duration;

        use linux_embedded_hal::I2cdev;
        use log::debug;

        use crate::display::error::DisplayError;
        use crate::display::interface::{I2cInterface, DEFAULT_SPEED_HZ, DEFAULT_TIMEOUT};

        let BusConfig::I2c { bus: path, address, speed_hz, timeout_ms } = bus;
        info!("Opening {} on {} at address 0x{:02X}", kind.name(), path, address);

        let i2c = I2cdev::new(path)
            .map_err(|e| DisplayError::I2cError(format!("Failed to open {}: {}", path, e)))?;

        let speed = speed_hz.unwrap_or(DEFAULT_SPEED_HZ);
        let timeout = timeout_ms.map(Duration::from_millis).unwrap_or(DEFAULT_TIMEOUT);
        debug!("i2c clock {} Hz, transaction timeout {:?}", speed, timeout);

        let interface = I2cInterface::with_address(i2c, *address)
            .speed_hz(speed)
            .timeout(timeout);

        let (width, height) = config.resolved_size().unwrap_or_else(|| kind.default_size());
        let mut display = PagedDisplay::with_size(interface, kind, width, height)?;
        Self::apply_options(&mut display, config)?;
        Ok(Box::new(display))
    }

    #[cfg(not(feature = "linux-i2c"))]
    fn create_hardware(
        _config: &DisplayConfig,
        kind: DriverKind,
        _bus: &BusConfig,
    ) -> Result<BoxedDisplay, DisplayFactoryError> {
        Err(DisplayFactoryError::UnsupportedCombination(format!(
            "{} over i2c needs the linux-i2c feature; use --dry-run or rebuild with --features linux-i2c",
            kind.name()
        )))
    }

    fn apply_options(display: &mut dyn Display, config: &DisplayConfig) -> Result<(), DisplayFactoryError> {
        if let Some(level) = config.contrast {
            display.set_contrast(level)?;
        }
        if let Some(invert) = config.invert {
            display.set_invert(invert)?;
        }
        Ok(())
    }

    /// Validate a configuration without creating a display
    ///
    /// Catches missing fields and bad geometry before any hardware is opened.
    pub fn validate_config(config: &DisplayConfig) -> Result<(), DisplayFactoryError> {
        let kind = config.driver.ok_or(DisplayFactoryError::NoDriverSpecified)?;

        let _bus_config = config.bus.as_ref()
            .ok_or(DisplayFactoryError::NoBusConfiguration)?;

        let (width, height) = config.resolved_size().unwrap_or_else(|| kind.default_size());
        let (w, h) = (width as usize, height as usize);
        if w == 0 || w > MAX_WIDTH || h == 0 || h % PAGE_HEIGHT != 0 || h > MAX_PAGES * PAGE_HEIGHT {
            return Err(DisplayFactoryError::ConfigError(format!(
                "{} cannot drive a {}x{} panel",
                kind.name(), width, height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::Transaction;

    fn config(driver: Option<DriverKind>) -> DisplayConfig {
        DisplayConfig {
            driver,
            bus: Some(BusConfig::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_config_no_driver() {
        assert!(matches!(
            DisplayFactory::validate_config(&config(None)),
            Err(DisplayFactoryError::NoDriverSpecified)
        ));
    }

    #[test]
    fn test_validate_config_no_bus() {
        let config = DisplayConfig {
            driver: Some(DriverKind::Ssd1306),
            bus: None,
            ..Default::default()
        };

        assert!(matches!(
            DisplayFactory::validate_config(&config),
            Err(DisplayFactoryError::NoBusConfiguration)
        ));
    }

    #[test]
    fn test_validate_config_bad_geometry() {
        let config = DisplayConfig {
            height: Some(48 + 4),
            ..config(Some(DriverKind::Ssd1306))
        };

        assert!(DisplayFactory::validate_config(&config).is_err());
    }

    #[test]
    fn test_dry_run_builds_display() {
        let config = DisplayConfig {
            height: Some(32),
            ..config(Some(DriverKind::Sh1106))
        };

        let display = DisplayFactory::create_from_config(&config, true).unwrap();
        assert_eq!(display.capabilities().driver, DriverKind::Sh1106);
        assert_eq!(display.height(), 32);
        assert_eq!(display.capabilities().page_count, 4);
    }

    #[test]
    fn test_dry_run_needs_no_bus() {
        let config = DisplayConfig {
            driver: Some(DriverKind::Ssd1306),
            ..Default::default()
        };

        assert!(DisplayFactory::create_from_config(&config, true).is_ok());
        assert!(matches!(
            DisplayFactory::create_from_config(&config, false),
            Err(DisplayFactoryError::NoBusConfiguration)
        ));
    }

    #[test]
    fn test_options_are_applied_after_bring_up() {
        let config = DisplayConfig {
            contrast: Some(0x10),
            invert: Some(true),
            ..config(Some(DriverKind::Ssd1306))
        };
        let mock = MockInterface::new();

        DisplayFactory::create_mock(&config, mock.clone()).unwrap();

        let tx = mock.transactions();
        assert_eq!(tx.len(), 3);
        assert_eq!(tx[1], Transaction::Commands(vec![0x81, 0x10]));
        assert_eq!(tx[2], Transaction::Commands(vec![0xA7]));
    }

    #[test]
    fn test_failed_bring_up_is_a_factory_error() {
        let mock = MockInterface::new();
        mock.fail_commands(true);

        let result = DisplayFactory::create_mock(&config(Some(DriverKind::Ssd1306)), mock);
        assert!(matches!(result, Err(DisplayFactoryError::DriverInitFailed(_))));
    }
}
