//! MediSim monitor - runs the device simulation as a service
//!
//! - Periodic tick driver over every simulated device (`driver`)
//! - Bounded activity feed of status changes (`feed`)
//! - Technician alert delivery, log or MQTT (`notifier`, `mqtt`)
//! - Read-only HTTP view of devices, logs and health (`http`)
//! - YAML configuration with defaults (`config`)

pub mod config;
pub mod driver;
pub mod feed;
pub mod health;
pub mod http;
pub mod mqtt;
pub mod notifier;
pub mod state;

pub use config::{load_config, MonitorConfig};
pub use driver::{build_supervisors, Simulation};
pub use feed::{LogFeed, LogSink};
pub use health::HealthTracker;
pub use notifier::{LogNotifier, Notifier};
