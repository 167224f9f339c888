pub mod config;
pub mod error;
pub mod intelligence;
pub mod telemetry;
