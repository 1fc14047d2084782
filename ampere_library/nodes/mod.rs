//! Nodes that run the telemetry registry inside a periodic control loop

pub mod current_logger;

pub use current_logger::CurrentLoggerNode;
