//! MediSim engine - simulated ventilator and defibrillator telemetry
//!
//! Each tick evolves a device's metrics and classifies the device:
//! - Bounded random walk per continuous metric (`fluctuation`)
//! - Occasional degraded excursions (`injector`)
//! - Gradual self-healing toward a healthy target (`healing`)
//! - Priority-ordered status classification (`status`)
//! - Full tick orchestration (`step`) and status-transition events (`supervisor`)
//!
//! Every transition is a pure function of the previous state and an
//! injectable [`RandomSource`], so runs replay identically from a seed.

pub mod device;
pub mod error;
pub mod events;
pub mod fluctuation;
pub mod healing;
pub mod injector;
pub mod metrics;
pub mod profile;
pub mod random;
pub mod status;
pub mod step;
pub mod supervisor;

pub use device::{DeviceState, HealingSet};
pub use error::SimulationError;
pub use events::{AlertNotice, DeviceEvent, LogEntry};
pub use metrics::{
    CapacitorStatus, DefibrillatorMetrics, FirmwareStatus, MetricSet, Readings,
    VentilatorMetrics,
};
pub use profile::{Band, BinaryProfile, DeviceKind, Direction, MetricName, MetricProfile};
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use status::{classify, Status};
pub use step::{create_initial, step};
pub use supervisor::{DeviceSupervisor, TickOutcome};
