//! # Ampere Core
//!
//! Current telemetry for motor controllers on a shared bus.
//!
//! - **Registry**: named devices refreshed and published once per control cycle
//! - **Devices**: the capability a motor controller exposes (batched rate
//!   configuration and batched refresh of stator/supply current)
//! - **Sinks**: receivers of `key = value` samples
//! - **Config**: YAML/TOML description of the devices to register
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ampere_core::{CurrentTelemetryRegistry, MemorySink};
//!
//! let mut registry = CurrentTelemetryRegistry::new();
//! registry.register("Arm", arm_controller);
//!
//! let mut sink = MemorySink::new();
//! registry.publish(&mut sink)?; // Current/Arm/Stator, Current/Arm/Supply
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod node;
pub mod registry;
pub mod sink;

pub use config::{DeviceConfig, TelemetryConfig, DEFAULT_UPDATE_FREQUENCY_HZ};
pub use device::{CurrentDevice, CurrentSignal, DriverStatus};
pub use error::{AmpereError, AmpereResult};
pub use node::{Node, NodeInfo, NodeMetrics, NodeState};
pub use registry::{stator_key, supply_key, ConfigState, CurrentTelemetryRegistry};
pub use sink::{LogSink, MemorySink, TelemetryRecord, TelemetrySink};
