//! # Ampere Library
//!
//! Drivers and nodes built on `ampere_core`.
//!
//! ## Structure
//!
//! ```text
//! ampere_library/
//! ── drivers/        # CurrentDevice implementations and the driver factory
//! ── nodes/          # CurrentLoggerNode
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ampere_core::{LogSink, TelemetryConfig};
//! use ampere_library::CurrentLoggerNode;
//!
//! let config = TelemetryConfig::from_file("ampere.yaml")?;
//! let mut logger = CurrentLoggerNode::from_config(&config, LogSink::default())?;
//! logger.tick(None); // once per control cycle
//! ```

pub mod drivers;
pub mod nodes;

pub use drivers::{
    create_current_device, MotorControllerBackend, MotorControllerDriver,
    SimulationMotorController, SimulationMotorControllerConfig,
};
pub use nodes::CurrentLoggerNode;
