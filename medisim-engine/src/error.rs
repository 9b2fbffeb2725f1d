use crate::profile::{DeviceKind, MetricName};

/// Contract violations detected on a state handed to the engine.
///
/// The transition itself never fails; these only fire when the caller passes
/// a state that does not belong to the declared device kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("device kind mismatch: expected {expected}, state carries {found}")]
    KindMismatch { expected: DeviceKind, found: DeviceKind },
    #[error("metric {metric} is not a finite number ({value})")]
    NonFiniteMetric { metric: MetricName, value: f64 },
    #[error("metric {metric} does not exist on a {kind}")]
    ForeignHealingMetric { kind: DeviceKind, metric: MetricName },
    #[error("unknown device kind: {0}")]
    UnknownKind(String),
}
