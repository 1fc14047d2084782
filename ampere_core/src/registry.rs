//! Current telemetry registry
//!
//! Holds named current-sensing devices, configures their report rate lazily,
//! and once per control cycle refreshes and republishes their readings as
//! `Current/<name>/Stator` and `Current/<name>/Supply`.
//!
//! The registry is driven entirely by its owner: nothing happens between
//! calls to [`CurrentTelemetryRegistry::publish`].
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = CurrentTelemetryRegistry::new();
//! registry.set_update_frequency_hz(100.0);
//! registry.register("FL", front_left);
//!
//! // once per loop
//! registry.publish(&mut sink)?;
//! ```

use crate::config::DEFAULT_UPDATE_FREQUENCY_HZ;
use crate::device::{CurrentDevice, CurrentSignal};
use crate::error::AmpereResult;
use crate::sink::TelemetrySink;

/// Prefix shared by every published key
pub const KEY_PREFIX: &str = "Current";

/// Key under which the stator current of `name` is published
pub fn stator_key(name: &str) -> String {
    signal_key(name, CurrentSignal::Stator)
}

/// Key under which the supply current of `name` is published
pub fn supply_key(name: &str) -> String {
    signal_key(name, CurrentSignal::Supply)
}

fn signal_key(name: &str, signal: CurrentSignal) -> String {
    format!("{}/{}/{}", KEY_PREFIX, name, signal.key_suffix())
}

/// Whether the current rate has been pushed to every registered device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigState {
    #[default]
    Unconfigured,
    Configured,
}

/// One registered device
struct SensorEntry {
    name: String,
    stator_key: String,
    supply_key: String,
    device: Box<dyn CurrentDevice>,
}

/// Registry of current sensors published once per control cycle.
///
/// Not synchronized: every operation takes `&mut self` and is meant to run on
/// the control loop's thread.
pub struct CurrentTelemetryRegistry {
    entries: Vec<SensorEntry>,
    update_frequency_hz: f64,
    state: ConfigState,
}

impl CurrentTelemetryRegistry {
    /// Create an empty registry with the default 50 Hz rate
    pub fn new() -> Self {
        Self::with_update_frequency(DEFAULT_UPDATE_FREQUENCY_HZ)
    }

    /// Create an empty registry with a custom rate
    pub fn with_update_frequency(hz: f64) -> Self {
        Self {
            entries: Vec::new(),
            update_frequency_hz: hz,
            state: ConfigState::Unconfigured,
        }
    }

    /// Set the report rate for all devices.
    ///
    /// Not validated here; devices are only touched on the next publish,
    /// which returns any error they raise.
    pub fn set_update_frequency_hz(&mut self, hz: f64) {
        self.update_frequency_hz = hz;
        self.state = ConfigState::Unconfigured;
    }

    /// Register a device, published as `Current/<name>/Stator` and `/Supply`.
    ///
    /// Duplicate names are accepted and publish duplicate keys.
    pub fn register<D>(&mut self, name: impl Into<String>, device: D)
    where
        D: CurrentDevice + 'static,
    {
        let name = name.into();
        log::debug!(
            "[Ampere] Registered '{}' ({}), {} device(s) total",
            name,
            device.device_name(),
            self.entries.len() + 1
        );

        self.entries.push(SensorEntry {
            stator_key: stator_key(&name),
            supply_key: supply_key(&name),
            name,
            device: Box::new(device),
        });
        self.state = ConfigState::Unconfigured;
    }

    /// Refresh every device and forward its readings to `sink`.
    ///
    /// Call once per control cycle. The first device failure is returned
    /// as-is and the rest of the cycle is skipped; the next call starts over
    /// from the first device.
    pub fn publish<S>(&mut self, sink: &mut S) -> AmpereResult<()>
    where
        S: TelemetrySink + ?Sized,
    {
        if self.entries.is_empty() {
            return Ok(());
        }

        self.configure_if_needed()?;

        for entry in &mut self.entries {
            // Both signals in one bus transaction
            entry.device.refresh(&CurrentSignal::ALL)?;

            let stator = entry.device.value(CurrentSignal::Stator)?;
            let supply = entry.device.value(CurrentSignal::Supply)?;

            sink.record_output(&entry.stator_key, stator);
            sink.record_output(&entry.supply_key, supply);
        }

        Ok(())
    }

    fn configure_if_needed(&mut self) -> AmpereResult<()> {
        if self.state == ConfigState::Configured {
            return Ok(());
        }

        let hz = self.update_frequency_hz;
        for entry in &mut self.entries {
            entry.device.set_update_frequency(hz, &CurrentSignal::ALL)?;
            entry.device.optimize_bus_utilization()?;
        }

        self.state = ConfigState::Configured;
        log::debug!(
            "[Ampere] Applied {} Hz to {} device(s)",
            hz,
            self.entries.len()
        );
        Ok(())
    }

    pub fn update_frequency_hz(&self) -> f64 {
        self.update_frequency_hz
    }

    pub fn state(&self) -> ConfigState {
        self.state
    }

    pub fn is_configured(&self) -> bool {
        self.state == ConfigState::Configured
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in publish order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl Default for CurrentTelemetryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CurrentTelemetryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentTelemetryRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("update_frequency_hz", &self.update_frequency_hz)
            .field("state", &self.state)
            .finish()
    }
}
