/*
 *  main.rs
 *
 *  pagedisp - paged OLED framebuffer
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use embedded_graphics::pixelcolor::BinaryColor;
use env_logger::Env;
use log::{debug, error, info, warn};

use pagedisp::config::{self, Cli, DriverKind};
use pagedisp::display::{Display, DisplayFactory};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Pixel rows taken by the volume bar at the bottom of the panel
const VOLUME_BAR_HEIGHT: u32 = 2;

fn main() -> anyhow::Result<()> {
    let (cfg, cli) = config::load()?;

    if cli.dump_config {
        print!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let mut display_cfg = cfg.display.clone().unwrap_or_default();
    if cli.dry_run && display_cfg.driver.is_none() {
        display_cfg.driver = Some(DriverKind::Ssd1306);
    }

    // no display is not fatal, there is just nothing to draw on
    let mut display = match DisplayFactory::create_from_config(&display_cfg, cli.dry_run) {
        Ok(display) => Some(display),
        Err(e) => {
            error!("Display unavailable: {}", e);
            None
        }
    };

    match display.as_deref_mut() {
        Some(display) => {
            render(display, &cli);
            if cli.preview {
                print!("{}", display.page_buffer().to_ascii());
            }
        }
        None if cli.preview => warn!("Nothing to preview without a display"),
        None => {}
    }

    Ok(())
}

fn render(display: &mut dyn Display, cli: &Cli) {
    let caps = display.capabilities();
    debug!(
        "{} {}x{}, {} lines of {} characters",
        caps.driver.name(),
        caps.width,
        caps.height,
        caps.page_count,
        caps.chars_per_line()
    );

    display.clear();
    for line in &cli.text {
        display.println(line);
    }
    if let Some(volume) = cli.volume {
        draw_volume(display, volume);
    }
    display.display();
}

/// Horizontal bar along the bottom rows, `volume` percent of the width lit.
fn draw_volume(display: &mut dyn Display, volume: u8) {
    let width = display.width();
    let y = display.height().saturating_sub(VOLUME_BAR_HEIGHT);
    let lit = width * u32::from(volume.min(100)) / 100;

    display.fill_rect(0, y, width, VOLUME_BAR_HEIGHT, BinaryColor::Off);
    display.fill_rect(0, y, lit, VOLUME_BAR_HEIGHT, BinaryColor::On);
}
