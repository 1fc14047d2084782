use ampere_core::config::TelemetryConfig;
use ampere_core::error::AmpereResult;
use ampere_core::{
    CurrentDevice, CurrentTelemetryRegistry, Node, NodeInfo, NodeState, TelemetrySink,
};

use crate::drivers::create_current_device;

/// Current Logger Node
///
/// Publishes the stator and supply current of every registered motor
/// controller once per tick, as `Current/<name>/Stator` and
/// `Current/<name>/Supply`.
///
/// A failed cycle is logged and counted; the next tick starts again from the
/// first device.
///
/// # Example
/// ```rust,ignore
/// use ampere_core::LogSink;
/// use ampere_library::nodes::CurrentLoggerNode;
///
/// let config = TelemetryConfig::find_and_load()?;
/// let mut logger = CurrentLoggerNode::from_config(&config, LogSink::default())?;
/// logger.register("Climber", climber_controller);
///
/// loop {
///     logger.tick(None);
/// }
/// ```
pub struct CurrentLoggerNode<S: TelemetrySink + Send> {
    registry: CurrentTelemetryRegistry,
    sink: S,

    // Cycle bookkeeping
    cycles: u64,
    failed_cycles: u64,
    last_error: Option<String>,
}

impl<S: TelemetrySink + Send> CurrentLoggerNode<S> {
    /// Create a logger with an empty registry at the default rate
    pub fn new(sink: S) -> Self {
        Self::with_registry(CurrentTelemetryRegistry::new(), sink)
    }

    /// Create a logger around an existing registry
    pub fn with_registry(registry: CurrentTelemetryRegistry, sink: S) -> Self {
        Self {
            registry,
            sink,
            cycles: 0,
            failed_cycles: 0,
            last_error: None,
        }
    }

    /// Build every enabled device in `config` and register it in file order
    pub fn from_config(config: &TelemetryConfig, sink: S) -> AmpereResult<Self> {
        let mut registry =
            CurrentTelemetryRegistry::with_update_frequency(config.update_frequency_hz);
        for device in config.enabled_devices() {
            let driver = create_current_device(device)?;
            registry.register(device.name.clone(), driver);
        }
        Ok(Self::with_registry(registry, sink))
    }

    /// Register an additional device
    pub fn register<D>(&mut self, name: impl Into<String>, device: D)
    where
        D: CurrentDevice + 'static,
    {
        self.registry.register(name, device);
    }

    /// Change the report rate of every device (applied next tick)
    pub fn set_update_frequency_hz(&mut self, hz: f64) {
        self.registry.set_update_frequency_hz(hz);
    }

    pub fn registry(&self) -> &CurrentTelemetryRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CurrentTelemetryRegistry {
        &mut self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of ticks run
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of ticks whose publish cycle failed
    pub fn failed_cycles(&self) -> u64 {
        self.failed_cycles
    }

    /// Error of the last tick, if it failed
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl<S: TelemetrySink + Send> Node for CurrentLoggerNode<S> {
    fn name(&self) -> &'static str {
        "current_logger"
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> AmpereResult<()> {
        ctx.log_info(&format!(
            "Publishing current for {} device(s) at {} Hz",
            self.registry.len(),
            self.registry.update_frequency_hz()
        ));
        ctx.set_state(NodeState::Running);
        Ok(())
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        if let Some(ctx) = ctx.as_deref_mut() {
            ctx.start_tick();
        }

        self.cycles += 1;
        let result = self.registry.publish(&mut self.sink);
        let success = result.is_ok();

        match result {
            Ok(()) => {
                self.last_error = None;
                if let Some(ctx) = ctx.as_deref_mut() {
                    ctx.set_state(NodeState::Running);
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.failed_cycles += 1;
                self.last_error = Some(message.clone());
                match ctx.as_deref_mut() {
                    Some(ctx) => {
                        self.on_error(&message, ctx);
                        ctx.set_state(NodeState::Error(message));
                    }
                    None => log::warn!("[current_logger] Publish cycle failed: {}", message),
                }
            }
        }

        if let Some(ctx) = ctx {
            ctx.record_tick(success);
        }
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> AmpereResult<()> {
        ctx.log_info(&format!(
            "Stopped after {} cycle(s), {} failed",
            self.cycles, self.failed_cycles
        ));
        ctx.set_state(NodeState::Stopped);
        Ok(())
    }

    fn on_error(&mut self, error: &str, ctx: &mut NodeInfo) {
        ctx.log_warning(&format!("Publish cycle failed: {}", error));
    }

    fn is_healthy(&self) -> bool {
        self.last_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::SimulationMotorController;
    use ampere_core::{DeviceConfig, MemorySink};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_from_config_registers_enabled_devices_in_order() {
        let mut config = TelemetryConfig::new();
        config.update_frequency_hz = 100.0;
        config.add_device(
            DeviceConfig::simulation("FL").with_option_f64("stator_current", 12.3),
        );
        let mut disabled = DeviceConfig::simulation("Spare");
        disabled.enabled = false;
        config.add_device(disabled);
        config.add_device(DeviceConfig::simulation("FR"));

        let mut node = CurrentLoggerNode::from_config(&config, MemorySink::new()).unwrap();
        assert_eq!(
            node.registry().names().collect::<Vec<_>>(),
            vec!["FL", "FR"]
        );
        assert_eq!(node.registry().update_frequency_hz(), 100.0);

        node.tick(None);
        assert!(node.is_healthy());
        assert_eq!(
            node.sink().keys(),
            vec![
                "Current/FL/Stator",
                "Current/FL/Supply",
                "Current/FR/Stator",
                "Current/FR/Supply"
            ]
        );
        assert_eq!(node.sink().latest("Current/FL/Stator"), Some(12.3));
    }

    #[test]
    fn test_from_config_unknown_backend() {
        let mut config = TelemetryConfig::new();
        let mut device = DeviceConfig::simulation("X");
        device.backend = "nope".to_string();
        config.add_device(device);

        assert!(CurrentLoggerNode::from_config(&config, MemorySink::new()).is_err());
    }

    #[test]
    fn test_failed_tick_is_counted_and_recovers() {
        let mut controller = SimulationMotorController::new("Arm");
        controller.init().unwrap();
        let shared = Arc::new(Mutex::new(controller));

        let mut node = CurrentLoggerNode::new(MemorySink::new());
        node.register("Arm", shared.clone());
        let mut ctx = NodeInfo::new(node.name());
        node.init(&mut ctx).unwrap();
        assert_eq!(ctx.state(), &NodeState::Running);

        shared.lock().set_connected(false);
        node.tick(Some(&mut ctx));
        assert!(!node.is_healthy());
        match ctx.state() {
            NodeState::Error(msg) => assert!(msg.contains("Arm")),
            other => panic!("expected error state, got {}", other),
        }
        assert_eq!(node.failed_cycles(), 1);
        assert!(node.last_error().unwrap().contains("Arm"));
        assert_eq!(ctx.metrics().failed_ticks, 1);
        assert!(node.sink().is_empty());

        shared.lock().set_connected(true);
        shared.lock().set_supply_current(3.0);
        node.tick(Some(&mut ctx));
        assert!(node.is_healthy());
        assert_eq!(node.cycles(), 2);
        assert_eq!(ctx.metrics().total_ticks, 2);
        assert_eq!(ctx.metrics().consecutive_failures, 0);
        assert_eq!(node.sink().latest("Current/Arm/Supply"), Some(3.0));
        assert_eq!(ctx.state(), &NodeState::Running);

        node.shutdown(&mut ctx).unwrap();
        assert_eq!(ctx.state(), &NodeState::Stopped);
    }
}
