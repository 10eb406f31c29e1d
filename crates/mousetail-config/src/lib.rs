//! Configuration management for mousetail
//!
//! Handles the daemon's TOML configuration: which mouse to look for and how,
//! the simulated charge rates, and the display bands.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/mousetail";
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "MOUSETAIL_CONFIG";

/// How the mouse is found on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// Walk the sysfs USB device tree and match vendor:product IDs
    #[default]
    Usb,
    /// Enumerate HID devices and match the product name
    Hid,
}

/// Which bundled threshold table drives the icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandPreset {
    /// Five bands in steps of roughly a quarter charge
    #[default]
    Coarse,
    /// Ten bands in steps of ten
    Fine,
}

/// Device identity and polling cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Probe strategy
    #[serde(default)]
    pub strategy: ProbeStrategy,

    /// USB identifier in `vvvv:pppp` form (usb strategy)
    #[serde(default = "default_usb_id")]
    pub usb_id: String,

    /// Vendor ID filter (hid strategy)
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    /// Product name to match (hid strategy)
    #[serde(default)]
    pub product: String,

    /// Seconds between bus scans
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_usb_id() -> String {
    "25a7:fa7b".to_string()
}

fn default_vendor_id() -> u16 {
    0x25a7
}

fn default_poll_interval() -> u64 {
    1
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            strategy: ProbeStrategy::default(),
            usb_id: default_usb_id(),
            vendor_id: default_vendor_id(),
            product: String::new(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Simulation rates and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Percentage points gained per tick on the wire
    #[serde(default = "default_increase_rate")]
    pub increase_rate: f32,

    /// Percentage points lost per tick on battery
    #[serde(default = "default_decrease_rate")]
    pub decrease_rate: f32,

    /// Seconds between simulation ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// Where the estimate is persisted
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_increase_rate() -> f32 {
    1.1
}

fn default_decrease_rate() -> f32 {
    0.05
}

fn default_tick_interval() -> u64 {
    60
}

fn default_state_file() -> PathBuf {
    PathBuf::from("settings.json")
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            increase_rate: default_increase_rate(),
            decrease_rate: default_decrease_rate(),
            tick_interval_secs: default_tick_interval(),
            state_file: default_state_file(),
        }
    }
}

/// Icon selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Which threshold table to use
    #[serde(default)]
    pub bands: BandPreset,
}

/// Main mousetail configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub battery: BatteryConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// `MOUSETAIL_CONFIG` names an explicit file and must exist when set.
    /// Otherwise the user config is tried, then the system one, then built-in
    /// defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        if let Some(home) = std::env::var_os("HOME") {
            let user_config = Path::new(&home).join(".config/mousetail").join(CONFIG_FILE);
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        let system_config = Path::new(CONFIG_DIR).join(CONFIG_FILE);
        if system_config.exists() {
            return Self::load(&system_config);
        }

        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Save to the default user configuration location
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| ConfigError::Invalid("HOME is not set".to_string()))?;
        let user_config = Path::new(&home).join(".config/mousetail").join(CONFIG_FILE);
        self.save(&user_config)
    }

    /// Check the invariants the daemon relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "device.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.battery.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "battery.tick_interval_secs must be at least 1".to_string(),
            ));
        }
        if !self.battery.increase_rate.is_finite() || self.battery.increase_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "battery.increase_rate must be a non-negative number".to_string(),
            ));
        }
        if !self.battery.decrease_rate.is_finite() || self.battery.decrease_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "battery.decrease_rate must be a non-negative number".to_string(),
            ));
        }

        match self.device.strategy {
            ProbeStrategy::Usb => {
                if self.device.usb_id.is_empty() {
                    return Err(ConfigError::Invalid(
                        "device.usb_id is required for the usb strategy".to_string(),
                    ));
                }
            }
            ProbeStrategy::Hid => {
                if self.device.product.is_empty() {
                    return Err(ConfigError::Invalid(
                        "device.product is required for the hid strategy".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
