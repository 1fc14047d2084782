//! Unified error handling for Ampere
//!
//! Device failures are split into the two classes a publish cycle can hit:
//! configuration (rate setting, bus optimization) and reads (refresh, value).
//! Everything else is ambient: config files and serialization.

use thiserror::Error;

/// Main error type for Ampere operations
#[derive(Debug, Error)]
pub enum AmpereError {
    /// Configuration file parsing or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A device rejected a rate configuration or bus optimization request
    #[error("Device '{device}' configuration failed: {message}")]
    Configuration { device: String, message: String },

    /// A device refresh or value read failed
    #[error("Device '{device}' read failed: {message}")]
    Read { device: String, message: String },

    /// Driver-related errors (backend selection, lifecycle)
    #[error("Driver error: {0}")]
    Driver(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Catch-all for other error types
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using AmpereError
pub type AmpereResult<T> = Result<T, AmpereError>;

impl From<serde_json::Error> for AmpereError {
    fn from(err: serde_json::Error) -> Self {
        AmpereError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AmpereError {
    fn from(err: toml::de::Error) -> Self {
        AmpereError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for AmpereError {
    fn from(err: toml::ser::Error) -> Self {
        AmpereError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for AmpereError {
    fn from(err: serde_yaml::Error) -> Self {
        AmpereError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<&str> for AmpereError {
    fn from(msg: &str) -> Self {
        AmpereError::Other(msg.to_string())
    }
}

impl From<String> for AmpereError {
    fn from(msg: String) -> Self {
        AmpereError::Other(msg)
    }
}

// Helper methods
impl AmpereError {
    /// Create a configuration file error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AmpereError::Config(msg.into())
    }

    /// Create a device configuration failure
    pub fn configuration<S: Into<String>, T: Into<String>>(device: S, message: T) -> Self {
        AmpereError::Configuration {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create a device read failure
    pub fn read<S: Into<String>, T: Into<String>>(device: S, message: T) -> Self {
        AmpereError::Read {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create a driver error
    pub fn driver<S: Into<String>>(msg: S) -> Self {
        AmpereError::Driver(msg.into())
    }

    /// Check if this is a device configuration failure
    pub fn is_configuration_failure(&self) -> bool {
        matches!(self, AmpereError::Configuration { .. })
    }

    /// Check if this is a device read failure
    pub fn is_read_failure(&self) -> bool {
        matches!(self, AmpereError::Read { .. })
    }

    /// Name of the device involved, for device failures
    pub fn device(&self) -> Option<&str> {
        match self {
            AmpereError::Configuration { device, .. } | AmpereError::Read { device, .. } => {
                Some(device)
            }
            _ => None,
        }
    }
}
