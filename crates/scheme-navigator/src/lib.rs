pub mod config;
pub mod error;
pub mod guidance;
pub mod schemes;
pub mod telemetry;
