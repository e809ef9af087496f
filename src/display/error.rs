/*
 *  display/error.rs
 *
 *  pagedisp - paged OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the display subsystem
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

use thiserror::Error;

/// Errors raised while bringing a display up or reconfiguring it.
///
/// Drawing and flushing never return these; a page that fails to reach the
/// panel simply stays dirty.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Bring-up sequence could not be delivered
    #[error("display initialization failed: {0}")]
    InitializationFailed(String),

    /// The platform I2C device could not be opened or used
    #[error("I2C communication error: {0}")]
    I2cError(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Panel geometry the page protocol cannot address
    #[error("unsupported display geometry {width}x{height}")]
    UnsupportedGeometry { width: u32, height: u32 },

    /// Error reported by the bus capability
    // display_interface::DisplayError doesn't implement std::error::Error,
    // so it can't be a #[source]
    #[error("display interface error: {0:?}")]
    Interface(display_interface::DisplayError),
}

impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        DisplayError::Interface(err)
    }
}

/// Factory error types
#[derive(Debug, Error)]
pub enum DisplayFactoryError {
    /// No driver specified in configuration
    #[error("no display driver specified in configuration")]
    NoDriverSpecified,

    /// No bus configuration specified
    #[error("no bus configuration specified")]
    NoBusConfiguration,

    /// Hardware bus support not compiled in
    #[error("unsupported driver/bus combination: {0}")]
    UnsupportedCombination(String),

    /// Display driver bring-up failed
    #[error("driver initialization failed: {0}")]
    DriverInitFailed(#[from] DisplayError),

    /// Configuration validation error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_error_conversion() {
        let err: DisplayError = display_interface::DisplayError::BusWriteError.into();
        assert!(matches!(
            err,
            DisplayError::Interface(display_interface::DisplayError::BusWriteError)
        ));
        assert!(err.to_string().contains("BusWriteError"));
    }

    #[test]
    fn test_factory_error_wraps_driver_error() {
        let err: DisplayFactoryError = DisplayError::UnsupportedGeometry { width: 200, height: 64 }.into();
        assert_eq!(
            err.to_string(),
            "driver initialization failed: unsupported display geometry 200x64"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
