//! Hardware drivers for Ampere
//!
//! Drivers implement `ampere_core::device::CurrentDevice` so they can be
//! registered with a `CurrentTelemetryRegistry`.
//!
//! ```text
//! Nodes (ampere_library/nodes/)
//!   │
//!   └── CurrentTelemetryRegistry (ampere_core)
//!           │
//!           └── CurrentDevice implementations (this module)
//!               └── Simulation drivers (always available)
//! ```
//!
//! # Adding a New Driver
//!
//! 1. Create a module under `motor_controller/`
//! 2. Implement `CurrentDevice`
//! 3. Add a variant to `MotorControllerDriver` and a backend name to the factory

pub mod factory;
pub mod motor_controller;

pub use factory::create_current_device;
pub use motor_controller::{
    MotorControllerBackend, MotorControllerDriver, SimulationMotorController,
    SimulationMotorControllerConfig,
};
