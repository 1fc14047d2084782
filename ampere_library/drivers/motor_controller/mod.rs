//! Motor controller drivers
//!
//! Current-sensing motor controllers usable with the telemetry registry.
//!
//! # Available Drivers
//!
//! - `SimulationMotorController` - Always available, reports synthetic currents

mod simulation;

// Re-exports
pub use simulation::{
    SimulationMotorController, SimulationMotorControllerConfig, MAX_NOISE_AMPLITUDE,
};

use ampere_core::device::{CurrentDevice, CurrentSignal, DriverStatus};
use ampere_core::error::AmpereResult;

/// Enum of all available motor controller backends
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MotorControllerBackend {
    /// Simulation driver (always available)
    #[default]
    Simulation,
}

/// Type-erased motor controller for runtime backend selection
pub enum MotorControllerDriver {
    Simulation(SimulationMotorController),
}

impl MotorControllerDriver {
    /// Create a simulation driver with custom configuration
    pub fn simulation_with_config(name: &str, config: SimulationMotorControllerConfig) -> Self {
        Self::Simulation(SimulationMotorController::with_config(name, config))
    }

    // ========================================================================
    // Lifecycle methods
    // ========================================================================

    pub fn init(&mut self) -> AmpereResult<()> {
        match self {
            Self::Simulation(d) => d.init(),
        }
    }

    pub fn shutdown(&mut self) -> AmpereResult<()> {
        match self {
            Self::Simulation(d) => d.shutdown(),
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            Self::Simulation(d) => d.is_available(),
        }
    }

    pub fn status(&self) -> DriverStatus {
        match self {
            Self::Simulation(d) => d.status(),
        }
    }

    pub fn backend(&self) -> MotorControllerBackend {
        match self {
            Self::Simulation(_) => MotorControllerBackend::Simulation,
        }
    }
}

impl CurrentDevice for MotorControllerDriver {
    fn set_update_frequency(&mut self, hz: f64, signals: &[CurrentSignal]) -> AmpereResult<()> {
        match self {
            Self::Simulation(d) => d.set_update_frequency(hz, signals),
        }
    }

    fn optimize_bus_utilization(&mut self) -> AmpereResult<()> {
        match self {
            Self::Simulation(d) => d.optimize_bus_utilization(),
        }
    }

    fn refresh(&mut self, signals: &[CurrentSignal]) -> AmpereResult<()> {
        match self {
            Self::Simulation(d) => d.refresh(signals),
        }
    }

    fn value(&self, signal: CurrentSignal) -> AmpereResult<f64> {
        match self {
            Self::Simulation(d) => d.value(signal),
        }
    }

    fn device_name(&self) -> String {
        match self {
            Self::Simulation(d) => d.device_name(),
        }
    }
}
