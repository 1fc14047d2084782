//! Telemetry sinks
//!
//! A sink receives named numeric samples. Recording is synchronous and never
//! fails; anything that can fail (network, disk) is buffered by the sink itself.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Receiver of published telemetry samples
pub trait TelemetrySink {
    /// Publish one named sample
    fn record_output(&mut self, key: &str, value: f64);
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for &mut S {
    fn record_output(&mut self, key: &str, value: f64) {
        (**self).record_output(key, value)
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Box<S> {
    fn record_output(&mut self, key: &str, value: f64) {
        (**self).record_output(key, value)
    }
}

impl<S: TelemetrySink> TelemetrySink for Arc<Mutex<S>> {
    fn record_output(&mut self, key: &str, value: f64) {
        self.lock().record_output(key, value)
    }
}

/// One recorded sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub key: String,
    pub value: f64,
}

/// In-memory sink keeping every sample in arrival order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TelemetryRecord>,
    latest: HashMap<String, f64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples in the order they were recorded
    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    /// Keys in the order they were recorded (repeats included)
    pub fn keys(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.key.as_str()).collect()
    }

    /// Most recent value recorded under `key`
    pub fn latest(&self, key: &str) -> Option<f64> {
        self.latest.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.latest.clear();
    }

    /// Serialize the recorded samples as a JSON array
    pub fn to_json(&self) -> crate::error::AmpereResult<String> {
        Ok(serde_json::to_string(&self.records)?)
    }
}

impl TelemetrySink for MemorySink {
    fn record_output(&mut self, key: &str, value: f64) {
        self.latest.insert(key.to_string(), value);
        self.records.push(TelemetryRecord {
            key: key.to_string(),
            value,
        });
    }
}

/// Sink forwarding every sample to the `log` facade
#[derive(Debug, Clone)]
pub struct LogSink {
    level: log::Level,
}

impl LogSink {
    /// Log target used for every sample
    pub const TARGET: &'static str = "ampere::telemetry";

    pub fn new(level: log::Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(log::Level::Debug)
    }
}

impl TelemetrySink for LogSink {
    fn record_output(&mut self, key: &str, value: f64) {
        log::log!(target: Self::TARGET, self.level, "{} = {:.3}", key, value);
    }
}
