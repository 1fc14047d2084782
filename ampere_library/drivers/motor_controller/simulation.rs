//! Simulation motor controller driver
//!
//! Always-available driver that reports synthetic stator and supply current.
//! Behaves like a CAN motor controller with respect to signal rates: rates
//! outside the accepted range are rejected, 0 Hz disables a signal, and bus
//! optimization disables every signal that was never configured.

use ampere_core::device::{CurrentDevice, CurrentSignal, DriverStatus};
use ampere_core::error::{AmpereError, AmpereResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest accepted noise amplitude (A)
pub const MAX_NOISE_AMPLITUDE: f64 = 100.0;

/// Simulation motor controller configuration
#[derive(Debug, Clone)]
pub struct SimulationMotorControllerConfig {
    /// Stator current reported at refresh (A)
    pub stator_current: f64,
    /// Supply current reported at refresh (A)
    pub supply_current: f64,
    /// Add uniform noise to every refreshed value
    pub add_noise: bool,
    /// Noise amplitude (A)
    pub noise_amplitude: f64,
    /// Lowest accepted non-zero update rate (Hz)
    pub min_update_hz: f64,
    /// Highest accepted update rate (Hz)
    pub max_update_hz: f64,
}

impl Default for SimulationMotorControllerConfig {
    fn default() -> Self {
        Self {
            stator_current: 0.0,
            supply_current: 0.0,
            add_noise: false,
            noise_amplitude: 0.05,
            min_update_hz: 4.0,
            max_update_hz: 1000.0,
        }
    }
}

/// Simulation motor controller driver
pub struct SimulationMotorController {
    name: String,
    config: SimulationMotorControllerConfig,
    status: DriverStatus,
    connected: bool,

    // Indexed by signal slot; None = never configured, Some(0.0) = disabled
    update_rates: [Option<f64>; 2],
    cached: [f64; 2],
    bus_optimized: bool,
    refresh_count: u64,
    rng: StdRng,
}

fn slot(signal: CurrentSignal) -> usize {
    match signal {
        CurrentSignal::Stator => 0,
        CurrentSignal::Supply => 1,
    }
}

impl SimulationMotorController {
    /// Create a new simulation controller with default configuration
    pub fn new(name: &str) -> Self {
        Self::with_config(name, SimulationMotorControllerConfig::default())
    }

    /// Create a new simulation controller with custom configuration
    pub fn with_config(name: &str, config: SimulationMotorControllerConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            status: DriverStatus::Uninitialized,
            connected: true,
            update_rates: [None; 2],
            cached: [0.0; 2],
            bus_optimized: false,
            refresh_count: 0,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn init(&mut self) -> AmpereResult<()> {
        self.cached = [0.0; 2];
        self.status = DriverStatus::Ready;
        Ok(())
    }

    pub fn shutdown(&mut self) -> AmpereResult<()> {
        self.status = DriverStatus::Shutdown;
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.connected
    }

    pub fn status(&self) -> DriverStatus {
        self.status.clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the live stator current (A)
    pub fn set_stator_current(&mut self, amps: f64) {
        self.config.stator_current = amps;
    }

    /// Set the live supply current (A)
    pub fn set_supply_current(&mut self, amps: f64) {
        self.config.supply_current = amps;
    }

    /// Simulate unplugging or reconnecting the device
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        let active = matches!(self.status, DriverStatus::Ready | DriverStatus::Running);
        if active && !connected {
            self.status = DriverStatus::Error("device not responding on bus".to_string());
        } else if connected && matches!(self.status, DriverStatus::Error(_)) {
            self.status = DriverStatus::Ready;
        }
    }

    /// Configured rate of a signal; `Some(0.0)` means disabled
    pub fn update_frequency(&self, signal: CurrentSignal) -> Option<f64> {
        self.update_rates[slot(signal)]
    }

    pub fn is_bus_optimized(&self) -> bool {
        self.bus_optimized
    }

    /// Number of successful refresh transactions
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    fn live_value(&mut self, signal: CurrentSignal) -> f64 {
        let base = match signal {
            CurrentSignal::Stator => self.config.stator_current,
            CurrentSignal::Supply => self.config.supply_current,
        };
        if self.config.add_noise && self.config.noise_amplitude > 0.0 {
            let amp = self.config.noise_amplitude;
            base + self.rng.gen_range(-amp..=amp)
        } else {
            base
        }
    }

    // gen_range panics on a non-finite or overflowing range
    fn check_noise(&self) -> AmpereResult<()> {
        let amp = self.config.noise_amplitude;
        if self.config.add_noise && !(amp.is_finite() && amp <= MAX_NOISE_AMPLITUDE) {
            return Err(AmpereError::read(
                &self.name,
                format!(
                    "noise amplitude {} A outside [0, {}] A",
                    amp, MAX_NOISE_AMPLITUDE
                ),
            ));
        }
        Ok(())
    }

    fn ensure_connected(&self) -> AmpereResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(AmpereError::read(&self.name, "device not responding on bus"))
        }
    }
}

impl CurrentDevice for SimulationMotorController {
    fn set_update_frequency(&mut self, hz: f64, signals: &[CurrentSignal]) -> AmpereResult<()> {
        if !self.connected {
            return Err(AmpereError::configuration(
                &self.name,
                "device not responding on bus",
            ));
        }

        let in_range = hz >= self.config.min_update_hz && hz <= self.config.max_update_hz;
        if hz != 0.0 && !in_range {
            return Err(AmpereError::configuration(
                &self.name,
                format!(
                    "update rate {} Hz outside [{}, {}] Hz",
                    hz, self.config.min_update_hz, self.config.max_update_hz
                ),
            ));
        }

        for signal in signals {
            self.update_rates[slot(*signal)] = Some(hz);
        }
        Ok(())
    }

    fn optimize_bus_utilization(&mut self) -> AmpereResult<()> {
        if !self.connected {
            return Err(AmpereError::configuration(
                &self.name,
                "device not responding on bus",
            ));
        }

        for rate in self.update_rates.iter_mut() {
            if rate.is_none() {
                *rate = Some(0.0);
            }
        }
        self.bus_optimized = true;
        Ok(())
    }

    fn refresh(&mut self, signals: &[CurrentSignal]) -> AmpereResult<()> {
        self.ensure_connected()?;
        if !matches!(self.status, DriverStatus::Ready | DriverStatus::Running) {
            return Err(AmpereError::read(&self.name, "driver not initialized"));
        }
        if let Some(disabled) = signals
            .iter()
            .find(|s| self.update_rates[slot(**s)] == Some(0.0))
        {
            return Err(AmpereError::read(
                &self.name,
                format!("{} current signal is disabled", disabled),
            ));
        }
        self.check_noise()?;

        // Sample everything first so the transaction is all-or-nothing
        let values: Vec<(usize, f64)> = signals
            .iter()
            .map(|s| (slot(*s), self.live_value(*s)))
            .collect();
        for (idx, value) in values {
            self.cached[idx] = value;
        }

        self.status = DriverStatus::Running;
        self.refresh_count += 1;
        Ok(())
    }

    fn value(&self, signal: CurrentSignal) -> AmpereResult<f64> {
        Ok(self.cached[slot(signal)])
    }

    fn device_name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ready(config: SimulationMotorControllerConfig) -> SimulationMotorController {
        let mut driver = SimulationMotorController::with_config("sim", config);
        driver.init().unwrap();
        driver
    }

    #[test]
    fn test_simulation_driver_lifecycle() {
        let mut driver = SimulationMotorController::new("sim");

        assert_eq!(driver.status(), DriverStatus::Uninitialized);
        assert!(driver.is_available());
        assert!(driver.refresh(&CurrentSignal::ALL).unwrap_err().is_read_failure());

        driver.init().unwrap();
        assert_eq!(driver.status(), DriverStatus::Ready);

        driver.refresh(&CurrentSignal::ALL).unwrap();
        assert_eq!(driver.status(), DriverStatus::Running);

        driver.shutdown().unwrap();
        assert_eq!(driver.status(), DriverStatus::Shutdown);
    }

    #[test]
    fn test_refresh_latches_values() {
        let mut driver = ready(SimulationMotorControllerConfig {
            stator_current: 12.3,
            supply_current: 5.1,
            ..Default::default()
        });

        // Cached values only change on refresh
        assert_eq!(driver.value(CurrentSignal::Stator).unwrap(), 0.0);
        driver.refresh(&CurrentSignal::ALL).unwrap();
        driver.set_stator_current(40.0);
        assert_relative_eq!(driver.value(CurrentSignal::Stator).unwrap(), 12.3);
        assert_relative_eq!(driver.value(CurrentSignal::Supply).unwrap(), 5.1);

        driver.refresh(&[CurrentSignal::Stator]).unwrap();
        assert_relative_eq!(driver.value(CurrentSignal::Stator).unwrap(), 40.0);
        assert_eq!(driver.refresh_count(), 2);
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let mut driver = ready(SimulationMotorControllerConfig {
            stator_current: 10.0,
            add_noise: true,
            noise_amplitude: 0.5,
            ..Default::default()
        });

        for _ in 0..50 {
            driver.refresh(&CurrentSignal::ALL).unwrap();
            let stator = driver.value(CurrentSignal::Stator).unwrap();
            assert!((9.5..=10.5).contains(&stator));
        }
    }

    #[test]
    fn test_oversized_noise_is_an_error() {
        for amp in [1e308, f64::INFINITY, f64::NAN, MAX_NOISE_AMPLITUDE * 2.0] {
            let mut driver = ready(SimulationMotorControllerConfig {
                add_noise: true,
                noise_amplitude: amp,
                ..Default::default()
            });
            let err = driver.refresh(&CurrentSignal::ALL).unwrap_err();
            assert!(err.is_read_failure());
            assert_eq!(driver.refresh_count(), 0);
        }
    }

    #[test]
    fn test_rate_range_checked() {
        let mut driver = ready(SimulationMotorControllerConfig::default());

        driver
            .set_update_frequency(100.0, &CurrentSignal::ALL)
            .unwrap();
        assert_eq!(driver.update_frequency(CurrentSignal::Supply), Some(100.0));

        let err = driver
            .set_update_frequency(2000.0, &CurrentSignal::ALL)
            .unwrap_err();
        assert!(err.is_configuration_failure());
        assert!(driver
            .set_update_frequency(1.0, &[CurrentSignal::Stator])
            .is_err());
        assert_eq!(driver.update_frequency(CurrentSignal::Stator), Some(100.0));

        // 0 Hz disables
        driver
            .set_update_frequency(0.0, &[CurrentSignal::Stator])
            .unwrap();
        assert!(driver.refresh(&CurrentSignal::ALL).is_err());
        assert!(driver.refresh(&[CurrentSignal::Supply]).is_ok());
    }

    #[test]
    fn test_bus_optimization_disables_unconfigured() {
        let mut driver = ready(SimulationMotorControllerConfig::default());

        driver
            .set_update_frequency(50.0, &[CurrentSignal::Supply])
            .unwrap();
        driver.optimize_bus_utilization().unwrap();

        assert!(driver.is_bus_optimized());
        assert_eq!(driver.update_frequency(CurrentSignal::Stator), Some(0.0));
        let err = driver.refresh(&CurrentSignal::ALL).unwrap_err();
        assert!(err.to_string().contains("Stator current signal is disabled"));
    }

    #[test]
    fn test_disconnected_device_fails() {
        let mut driver = ready(SimulationMotorControllerConfig::default());
        driver.set_connected(false);

        assert!(!driver.is_available());
        assert!(matches!(driver.status(), DriverStatus::Error(_)));
        assert!(driver
            .set_update_frequency(50.0, &CurrentSignal::ALL)
            .unwrap_err()
            .is_configuration_failure());
        assert!(driver.optimize_bus_utilization().is_err());
        assert!(driver.refresh(&CurrentSignal::ALL).unwrap_err().is_read_failure());

        driver.set_connected(true);
        assert_eq!(driver.status(), DriverStatus::Ready);
        assert!(driver.refresh(&CurrentSignal::ALL).is_ok());
    }
}
