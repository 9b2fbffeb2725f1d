use crate::error::SimulationError;
use crate::metrics::MetricSet;
use crate::profile::{DeviceKind, MetricName};
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Metrics currently recovering. Ordered so snapshots serialize stably.
pub type HealingSet = BTreeSet<MetricName>;

/// One device at one tick. Each tick produces a new value; nothing patches
/// a previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    pub id: String,
    pub kind: DeviceKind,
    pub metrics: MetricSet,
    #[serde(default)]
    pub healing: HealingSet,
    pub status: Status,
    pub last_updated: DateTime<Utc>,
}

impl DeviceState {
    /// Rejects a state that cannot have come from a `kind` device: wrong
    /// metric shape, non-finite values, or healing entries for metrics the
    /// kind does not have.
    pub fn validate(&self, kind: DeviceKind) -> Result<(), SimulationError> {
        if self.kind != kind {
            return Err(SimulationError::KindMismatch { expected: kind, found: self.kind });
        }
        if self.metrics.kind() != kind {
            return Err(SimulationError::KindMismatch {
                expected: kind,
                found: self.metrics.kind(),
            });
        }
        for (profile, value) in self.metrics.readings().iter() {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteMetric { metric: profile.name, value });
            }
        }
        if let Some(metric) = self.healing.iter().find(|m| kind.profile(**m).is_none()) {
            return Err(SimulationError::ForeignHealingMetric { kind, metric: *metric });
        }
        Ok(())
    }

    pub fn is_healing(&self, metric: MetricName) -> bool {
        self.healing.contains(&metric)
    }
}
