use std::fmt;
use std::time::{Duration, Instant};

/// Node states for lifecycle tracking
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Running,
    Stopped,
    Error(String),
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Uninitialized => write!(f, "Uninitialized"),
            NodeState::Running => write!(f, "Running"),
            NodeState::Stopped => write!(f, "Stopped"),
            NodeState::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Per-node tick counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMetrics {
    pub total_ticks: u64,
    pub failed_ticks: u64,
    pub consecutive_failures: u64,
    pub last_tick_duration: Duration,
}

/// Runtime context handed to a node by whatever loop drives it
#[derive(Debug)]
pub struct NodeInfo {
    name: String,
    state: NodeState,
    metrics: NodeMetrics,
    tick_start_time: Option<Instant>,
}

impl NodeInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: NodeState::Uninitialized,
            metrics: NodeMetrics::default(),
            tick_start_time: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn set_state(&mut self, state: NodeState) {
        if self.state != state {
            log::debug!("[{}] {} -> {}", self.name, self.state, state);
        }
        self.state = state;
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    pub fn start_tick(&mut self) {
        self.tick_start_time = Some(Instant::now());
    }

    /// Close the current tick and update counters
    pub fn record_tick(&mut self, success: bool) {
        self.metrics.total_ticks += 1;
        if let Some(start) = self.tick_start_time.take() {
            self.metrics.last_tick_duration = start.elapsed();
        }
        if success {
            self.metrics.consecutive_failures = 0;
        } else {
            self.metrics.failed_ticks += 1;
            self.metrics.consecutive_failures += 1;
        }
    }

    pub fn log_info(&self, message: &str) {
        log::info!("[{}] {}", self.name, message);
    }

    pub fn log_warning(&self, message: &str) {
        log::warn!("[{}] {}", self.name, message);
    }

    pub fn log_error(&self, message: &str) {
        log::error!("[{}] {}", self.name, message);
    }
}

/// A unit of periodic work driven by an external control loop
pub trait Node: Send {
    /// Get the node's name
    fn name(&self) -> &'static str;

    /// Initialize the node (called once at startup)
    fn init(&mut self, ctx: &mut NodeInfo) -> crate::error::AmpereResult<()> {
        ctx.log_info("Node initialized successfully");
        Ok(())
    }

    /// One control cycle
    fn tick(&mut self, ctx: Option<&mut NodeInfo>);

    /// Shutdown the node (called once at cleanup)
    fn shutdown(&mut self, ctx: &mut NodeInfo) -> crate::error::AmpereResult<()> {
        ctx.log_info("Node shutdown successfully");
        Ok(())
    }

    /// Handle errors (optional override)
    fn on_error(&mut self, error: &str, ctx: &mut NodeInfo) {
        ctx.log_error(&format!("Node error: {}", error));
    }

    /// Health check (optional override)
    fn is_healthy(&self) -> bool {
        true
    }
}
