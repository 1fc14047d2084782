//! Device capability for current-sensing motor controllers
//!
//! A device exposes two signals, stator current and supply current, each with
//! a cached value that is updated by an explicit batched refresh. Rate
//! configuration is batched the same way.
//!
//! # Example Device
//!
//! ```rust,ignore
//! struct MyController { stator: f64, supply: f64 }
//!
//! impl CurrentDevice for MyController {
//!     fn set_update_frequency(&mut self, hz: f64, signals: &[CurrentSignal]) -> AmpereResult<()> { ... }
//!     fn optimize_bus_utilization(&mut self) -> AmpereResult<()> { ... }
//!     fn refresh(&mut self, signals: &[CurrentSignal]) -> AmpereResult<()> { ... }
//!     fn value(&self, signal: CurrentSignal) -> AmpereResult<f64> { ... }
//! }
//! ```

use crate::error::AmpereResult;
use parking_lot::Mutex;
use std::sync::Arc;

/// One current signal reported by a motor controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentSignal {
    /// Current in the motor winding
    Stator,
    /// Current drawn from the supply bus
    Supply,
}

impl CurrentSignal {
    /// Both signals, in the order they are published
    pub const ALL: [CurrentSignal; 2] = [CurrentSignal::Stator, CurrentSignal::Supply];

    /// Suffix used in published telemetry keys
    pub fn key_suffix(&self) -> &'static str {
        match self {
            Self::Stator => "Stator",
            Self::Supply => "Supply",
        }
    }
}

impl std::fmt::Display for CurrentSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_suffix())
    }
}

/// Driver status for lifecycle tracking
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DriverStatus {
    /// Driver has not been initialized yet
    #[default]
    Uninitialized,
    /// Driver is ready to operate
    Ready,
    /// Driver is actively being refreshed
    Running,
    /// Driver encountered an error
    Error(String),
    /// Driver has been shut down
    Shutdown,
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Ready => write!(f, "Ready"),
            Self::Running => write!(f, "Running"),
            Self::Error(msg) => write!(f, "Error: {}", msg),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// A hardware handle that reports stator and supply current.
///
/// Every call may block on the bus. Failures are returned as
/// [`AmpereError::Configuration`](crate::AmpereError::Configuration) or
/// [`AmpereError::Read`](crate::AmpereError::Read).
pub trait CurrentDevice: Send {
    /// Set the report rate of all listed signals in one request
    fn set_update_frequency(&mut self, hz: f64, signals: &[CurrentSignal]) -> AmpereResult<()>;

    /// Stop reporting every signal that has not been explicitly configured
    fn optimize_bus_utilization(&mut self) -> AmpereResult<()>;

    /// Update the cached values of all listed signals in one transaction
    fn refresh(&mut self, signals: &[CurrentSignal]) -> AmpereResult<()>;

    /// Cached value of a signal, as of the last refresh
    fn value(&self, signal: CurrentSignal) -> AmpereResult<f64>;

    /// Name used in diagnostics
    fn device_name(&self) -> String {
        "device".to_string()
    }
}

// Shared handles: the subsystem driving the motor keeps one clone,
// the registry another.
impl<D: CurrentDevice> CurrentDevice for Arc<Mutex<D>> {
    fn set_update_frequency(&mut self, hz: f64, signals: &[CurrentSignal]) -> AmpereResult<()> {
        self.lock().set_update_frequency(hz, signals)
    }

    fn optimize_bus_utilization(&mut self) -> AmpereResult<()> {
        self.lock().optimize_bus_utilization()
    }

    fn refresh(&mut self, signals: &[CurrentSignal]) -> AmpereResult<()> {
        self.lock().refresh(signals)
    }

    fn value(&self, signal: CurrentSignal) -> AmpereResult<f64> {
        self.lock().value(signal)
    }

    fn device_name(&self) -> String {
        self.lock().device_name()
    }
}

impl<D: CurrentDevice + ?Sized> CurrentDevice for Box<D> {
    fn set_update_frequency(&mut self, hz: f64, signals: &[CurrentSignal]) -> AmpereResult<()> {
        (**self).set_update_frequency(hz, signals)
    }

    fn optimize_bus_utilization(&mut self) -> AmpereResult<()> {
        (**self).optimize_bus_utilization()
    }

    fn refresh(&mut self, signals: &[CurrentSignal]) -> AmpereResult<()> {
        (**self).refresh(signals)
    }

    fn value(&self, signal: CurrentSignal) -> AmpereResult<f64> {
        (**self).value(signal)
    }

    fn device_name(&self) -> String {
        (**self).device_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDevice {
        refreshed: bool,
    }

    impl CurrentDevice for FixedDevice {
        fn set_update_frequency(&mut self, _hz: f64, _signals: &[CurrentSignal]) -> AmpereResult<()> {
            Ok(())
        }

        fn optimize_bus_utilization(&mut self) -> AmpereResult<()> {
            Ok(())
        }

        fn refresh(&mut self, _signals: &[CurrentSignal]) -> AmpereResult<()> {
            self.refreshed = true;
            Ok(())
        }

        fn value(&self, signal: CurrentSignal) -> AmpereResult<f64> {
            Ok(match signal {
                CurrentSignal::Stator => 1.5,
                CurrentSignal::Supply => 0.5,
            })
        }
    }

    #[test]
    fn test_signal_suffix() {
        assert_eq!(CurrentSignal::Stator.to_string(), "Stator");
        assert_eq!(CurrentSignal::Supply.key_suffix(), "Supply");
        assert_eq!(CurrentSignal::ALL.len(), 2);
    }

    #[test]
    fn test_driver_status_display() {
        assert_eq!(DriverStatus::Ready.to_string(), "Ready");
        assert_eq!(
            DriverStatus::Error("bus off".to_string()).to_string(),
            "Error: bus off"
        );
        assert_eq!(DriverStatus::default(), DriverStatus::Uninitialized);
    }

    #[test]
    fn test_shared_handle_delegates() {
        let shared = Arc::new(Mutex::new(FixedDevice { refreshed: false }));
        let mut handle = shared.clone();

        handle.refresh(&CurrentSignal::ALL).unwrap();
        assert!(shared.lock().refreshed);
        assert_eq!(handle.value(CurrentSignal::Stator).unwrap(), 1.5);
        assert_eq!(handle.device_name(), "device");
    }
}
