//! Telemetry configuration (YAML/TOML support)
//!
//! Describes the publish rate and the ordered list of devices to register.
//! File order is registration order, and so publish order.
//!
//! # Example YAML
//!
//! ```yaml
//! update_frequency_hz: 100.0
//! devices:
//!   - name: FL
//!     backend: simulation
//!     can_id: 1
//!     stator_current: 12.3
//!   - name: Arm
//!     backend: simulation
//!     enabled: false
//! ```

use crate::error::{AmpereError, AmpereResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Rate applied to every device when none is configured
pub const DEFAULT_UPDATE_FREQUENCY_HZ: f64 = 50.0;

fn default_update_frequency_hz() -> f64 {
    DEFAULT_UPDATE_FREQUENCY_HZ
}

fn default_enabled() -> bool {
    true
}

fn default_backend() -> String {
    "simulation".to_string()
}

/// Configuration for a single current-sensing device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Display name; published keys are `Current/<name>/...`
    pub name: String,

    /// Driver backend identifier (e.g. "simulation")
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Enable/disable the device (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// CAN device id
    #[serde(default)]
    pub can_id: Option<u8>,

    /// CAN bus name (e.g. "rio", "canivore")
    #[serde(default)]
    pub bus: Option<String>,

    /// Additional driver-specific options
    #[serde(flatten)]
    pub options: HashMap<String, serde_yaml::Value>,
}

impl DeviceConfig {
    /// Create a simulation device config
    pub fn simulation(name: &str) -> Self {
        Self {
            name: name.to_string(),
            backend: default_backend(),
            enabled: true,
            can_id: None,
            bus: None,
            options: HashMap::new(),
        }
    }

    /// Set a driver-specific numeric option
    pub fn with_option_f64(mut self, key: &str, value: f64) -> Self {
        self.options
            .insert(key.to_string(), serde_yaml::Value::from(value));
        self
    }

    /// Check if this is a simulation backend ("simulation" or "sim")
    pub fn is_simulation(&self) -> bool {
        matches!(self.backend.as_str(), "simulation" | "sim")
    }

    /// Get an option value as f64 (integers are widened)
    pub fn get_option_f64(&self, key: &str) -> Option<f64> {
        self.options.get(key).and_then(|v| v.as_f64())
    }
}

/// Full telemetry configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Report rate applied to every device's current signals
    #[serde(default = "default_update_frequency_hz")]
    pub update_frequency_hz: f64,

    /// Devices in registration order
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl TelemetryConfig {
    /// Create an empty config with the default rate
    pub fn new() -> Self {
        Self {
            update_frequency_hz: DEFAULT_UPDATE_FREQUENCY_HZ,
            devices: Vec::new(),
        }
    }

    /// Load config from a file (auto-detect format)
    pub fn from_file<P: AsRef<Path>>(path: P) -> AmpereResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AmpereError::config(format!(
                "Failed to read telemetry config {}: {}",
                path.display(),
                e
            ))
        })?;

        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("toml") => Self::from_toml(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_yaml(&contents).or_else(|_| Self::from_toml(&contents)),
        }
    }

    /// Parse config from YAML string
    pub fn from_yaml(contents: &str) -> AmpereResult<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| AmpereError::config(format!("Failed to parse telemetry YAML: {}", e)))
    }

    /// Parse config from TOML string
    pub fn from_toml(contents: &str) -> AmpereResult<Self> {
        toml::from_str(contents)
            .map_err(|e| AmpereError::config(format!("Failed to parse telemetry TOML: {}", e)))
    }

    /// Find and load config from the working directory
    ///
    /// Search order: `ampere.yaml`, `ampere.yml`, `ampere.toml`.
    pub fn find_and_load() -> AmpereResult<Self> {
        Self::find_and_load_in(".")
    }

    /// Same as [`find_and_load`](Self::find_and_load), rooted at `dir`
    pub fn find_and_load_in<P: AsRef<Path>>(dir: P) -> AmpereResult<Self> {
        let dir = dir.as_ref();
        let candidates: Vec<PathBuf> = ["ampere.yaml", "ampere.yml", "ampere.toml"]
            .iter()
            .map(|name| dir.join(name))
            .collect();

        for path in candidates {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(AmpereError::config(format!(
            "No telemetry config file found in {}",
            dir.display()
        )))
    }

    /// Save config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AmpereResult<()> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(self)?,
            _ => serde_yaml::to_string(self)?,
        };

        std::fs::write(path, contents)
            .map_err(|e| AmpereError::config(format!("Failed to write telemetry config: {}", e)))
    }

    /// Add a device at the end of the list
    pub fn add_device(&mut self, device: DeviceConfig) {
        self.devices.push(device);
    }

    /// Get the first device config with this name
    pub fn get_device(&self, name: &str) -> AmpereResult<&DeviceConfig> {
        self.devices
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| AmpereError::config(format!("Device '{}' not found in config", name)))
    }

    /// Enabled devices, in file order
    pub fn enabled_devices(&self) -> impl Iterator<Item = &DeviceConfig> {
        self.devices.iter().filter(|d| d.enabled)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
update_frequency_hz: 100.0
devices:
  - name: FL
    backend: simulation
    can_id: 1
    stator_current: 12.3
  - name: Arm
    bus: canivore
    enabled: false
"#;
        let config = TelemetryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.update_frequency_hz, 100.0);
        assert_eq!(config.devices.len(), 2);

        let fl = config.get_device("FL").unwrap();
        assert_eq!(fl.can_id, Some(1));
        assert_eq!(fl.get_option_f64("stator_current"), Some(12.3));
        assert!(fl.is_simulation());

        let arm = config.get_device("Arm").unwrap();
        assert_eq!(arm.backend, "simulation");
        assert_eq!(arm.bus.as_deref(), Some("canivore"));

        let enabled: Vec<&str> = config.enabled_devices().map(|d| d.name.as_str()).collect();
        assert_eq!(enabled, vec!["FL"]);
    }

    #[test]
    fn test_toml_config() {
        let toml = r#"
[[devices]]
name = "Shooter"
backend = "sim"
supply_current = 4

[[devices]]
name = "Intake"
"#;
        let config = TelemetryConfig::from_toml(toml).unwrap();
        assert_eq!(config.update_frequency_hz, DEFAULT_UPDATE_FREQUENCY_HZ);
        assert_eq!(config.devices[0].name, "Shooter");
        assert_eq!(config.devices[0].get_option_f64("supply_current"), Some(4.0));
        assert_eq!(config.devices[1].name, "Intake");
    }

    #[test]
    fn test_simulation_backend_names() {
        let mut device = DeviceConfig::simulation("FL");
        assert!(device.is_simulation());
        device.backend = "sim".to_string();
        assert!(device.is_simulation());
        for other in ["simulator", "simx", "SIM", ""] {
            device.backend = other.to_string();
            assert!(!device.is_simulation(), "{:?} treated as simulation", other);
        }
    }

    #[test]
    fn test_missing_device() {
        let config = TelemetryConfig::new();
        assert!(matches!(
            config.get_device("nope"),
            Err(AmpereError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(TelemetryConfig::from_yaml("devices: [").is_err());
    }
}
