use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::interface::{DEFAULT_ADDRESS, DEFAULT_SPEED_HZ, DEFAULT_TIMEOUT};
use crate::display::page_buffer::{MAX_PAGES, MAX_WIDTH, PAGE_HEIGHT};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// panel geometry, controller and wiring
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub contrast: Option<u8>,       // 0-255, bring-up leaves it at 255
    pub invert: Option<bool>,
    pub driver: Option<DriverKind>,
    pub bus: Option<BusConfig>,
}

impl DisplayConfig {
    /// Geometry after falling back to the controller's default size
    pub fn resolved_size(&self) -> Option<(u32, u32)> {
        let (w, h) = self.driver?.default_size();
        Some((self.width.unwrap_or(w), self.height.unwrap_or(h)))
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "pagedisp", version, about = "Paged OLED framebuffer tool")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    #[arg(long)]
    pub display_width: Option<u32>,
    #[arg(long)]
    pub display_height: Option<u32>,
    #[arg(long)]
    pub contrast: Option<u8>,
    #[arg(long, action = ArgAction::Set)]
    pub display_invert: Option<bool>,
    /// I2C device node, e.g. /dev/i2c-1
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub i2c_bus: Option<String>,
    /// 7-bit I2C address, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_address)]
    pub i2c_address: Option<u8>,
    /// record bus traffic instead of opening hardware
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
    /// print the page buffer as ASCII art after drawing
    #[arg(long, action = ArgAction::SetTrue)]
    pub preview: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
    /// line of text to print, may be repeated
    #[arg(long = "text", short = 't')]
    pub text: Vec<String>,
    /// draw a volume bar (percent) along the bottom rows
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address {s:?}: {e}"))
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;
    Ok((cfg, cli))
}

/// Layer defaults, YAML and the given CLI overrides, then validate.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of the effective config
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/pagedisp/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/pagedisp/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/pagedisp.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["pagedisp.yaml", "config.yaml", "config/pagedisp.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
    if src.contrast.is_some()    { dst.contrast = src.contrast; }
    if src.invert.is_some()      { dst.invert = src.invert; }
    if src.driver.is_some()      { dst.driver = src.driver; }
    if src.bus.is_some()         { dst.bus = src.bus; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    let any_display = cli.display_width.is_some()
        || cli.display_height.is_some()
        || cli.contrast.is_some()
        || cli.display_invert.is_some()
        || cli.driver.is_some()
        || cli.i2c_bus.is_some()
        || cli.i2c_address.is_some();

    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    let Some(display) = cfg.display.as_mut() else { return };

    if cli.display_width.is_some()   { display.width = cli.display_width; }
    if cli.display_height.is_some()  { display.height = cli.display_height; }
    if cli.contrast.is_some()        { display.contrast = cli.contrast; }
    if cli.display_invert.is_some()  { display.invert = cli.display_invert; }
    if cli.driver.is_some()          { display.driver = cli.driver; }

    if cli.i2c_bus.is_some() || cli.i2c_address.is_some() {
        let bus = display.bus.get_or_insert_with(BusConfig::default);
        let BusConfig::I2c { bus: path, address, .. } = bus;
        if let Some(p) = cli.i2c_bus.as_ref() { *path = p.clone(); }
        if let Some(a) = cli.i2c_address     { *address = a; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let Some(display) = cfg.display.as_ref() else { return Ok(()) };

    if let Some(w) = display.width {
        if w == 0 || w as usize > MAX_WIDTH {
            return Err(ConfigError::Validation(format!(
                "display width must be 1..={MAX_WIDTH}, got {w}"
            )));
        }
    }
    if let Some(h) = display.height {
        if h == 0 || h as usize % PAGE_HEIGHT != 0 || h as usize > MAX_PAGES * PAGE_HEIGHT {
            return Err(ConfigError::Validation(format!(
                "display height must be a multiple of {PAGE_HEIGHT} up to {}, got {h}",
                MAX_PAGES * PAGE_HEIGHT
            )));
        }
    }
    if let Some(BusConfig::I2c { bus, address, timeout_ms, .. }) = display.bus.as_ref() {
        if bus.is_empty() {
            return Err(ConfigError::Validation("i2c bus path must not be empty".into()));
        }
        if *address > 0x77 {
            return Err(ConfigError::Validation(format!(
                "i2c address 0x{address:02X} is not a 7-bit address"
            )));
        }
        if *timeout_ms == Some(0) {
            return Err(ConfigError::Validation("i2c timeout_ms must be > 0".into()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusConfig {
    I2c {
        bus: String,        // e.g. "/dev/i2c-1"
        address: u8,        // e.g. 0x3C (I2C addresses are 7-bit, stored in u8)
        speed_hz: Option<u32>,
        timeout_ms: Option<u64>,
    },
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig::I2c {
            bus: "/dev/i2c-1".to_string(),
            address: DEFAULT_ADDRESS,
            speed_hz: Some(DEFAULT_SPEED_HZ),
            timeout_ms: Some(DEFAULT_TIMEOUT.as_millis() as u64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Ssd1306,
    Sh1106,
}
