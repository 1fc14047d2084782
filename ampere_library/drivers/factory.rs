//! Driver Factory - Create motor controllers from configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use ampere_core::DeviceConfig;
//! use ampere_library::drivers::factory::create_current_device;
//!
//! let config = DeviceConfig::simulation("Arm").with_option_f64("stator_current", 20.0);
//! let driver = create_current_device(&config)?;
//! registry.register(&config.name, driver);
//! ```

use ampere_core::config::DeviceConfig;
use ampere_core::error::{AmpereError, AmpereResult};

use super::motor_controller::{
    MotorControllerBackend, MotorControllerDriver, SimulationMotorControllerConfig,
    MAX_NOISE_AMPLITUDE,
};

/// Create an initialized motor controller from configuration
///
/// # Supported Backends
///
/// - `simulation` / `sim` - Always available. Options: `stator_current`,
///   `supply_current`, `noise` (amplitude in A, enables noise when > 0,
///   at most `MAX_NOISE_AMPLITUDE`)
pub fn create_current_device(config: &DeviceConfig) -> AmpereResult<MotorControllerDriver> {
    let backend = if config.is_simulation() {
        MotorControllerBackend::Simulation
    } else {
        return Err(AmpereError::driver(format!(
            "Motor controller backend '{}' is not available for '{}'. Available: simulation",
            config.backend, config.name
        )));
    };

    let mut driver = match backend {
        MotorControllerBackend::Simulation => {
            let defaults = SimulationMotorControllerConfig::default();
            let noise = config.get_option_f64("noise").unwrap_or(0.0);
            if !noise.is_finite() || noise > MAX_NOISE_AMPLITUDE {
                return Err(AmpereError::config(format!(
                    "Device '{}': noise {} A outside [0, {}] A",
                    config.name, noise, MAX_NOISE_AMPLITUDE
                )));
            }
            let sim = SimulationMotorControllerConfig {
                stator_current: config
                    .get_option_f64("stator_current")
                    .unwrap_or(defaults.stator_current),
                supply_current: config
                    .get_option_f64("supply_current")
                    .unwrap_or(defaults.supply_current),
                add_noise: noise > 0.0,
                noise_amplitude: if noise > 0.0 {
                    noise
                } else {
                    defaults.noise_amplitude
                },
                ..defaults
            };
            MotorControllerDriver::simulation_with_config(&config.name, sim)
        }
    };

    driver.init()?;
    Ok(driver)
}
