//! Full device tick
//!
//! Order per tick: fluctuate continuous metrics, toggle the binary field,
//! maybe inject a degraded reading, heal, classify, stamp. The next state
//! is assembled from the computed parts; the previous one is only read.

use crate::device::{DeviceState, HealingSet};
use crate::error::SimulationError;
use crate::fluctuation::fluctuate;
use crate::healing::apply_healing;
use crate::injector::maybe_inject;
use crate::metrics::{MetricSet, Readings};
use crate::profile::DeviceKind;
use crate::random::{sample, RandomSource};
use crate::status::{classify, Status};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Seeds a device from its healthy sub-ranges. Status starts `Normal`.
pub fn create_initial<R: RandomSource + ?Sized>(
    kind: DeviceKind,
    rng: &mut R,
    now: DateTime<Utc>,
) -> DeviceState {
    let values = (*kind.profiles()).map(|p| sample(rng, p.seed.min, p.seed.max, 1));
    let binary_ok = rng.chance(kind.binary().initial_ok_probability);

    DeviceState {
        id: format!("{}-{}", kind, now.timestamp_millis()),
        kind,
        metrics: MetricSet::assemble(&Readings::new(kind, values), binary_ok),
        healing: HealingSet::new(),
        status: Status::Normal,
        last_updated: now,
    }
}

/// Advances `previous` by one tick.
///
/// Fails only when `previous` does not belong to `kind`; the transition
/// itself is total.
pub fn step<R: RandomSource + ?Sized>(
    kind: DeviceKind,
    previous: &DeviceState,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<DeviceState, SimulationError> {
    previous.validate(kind)?;

    let fluctuated = previous
        .metrics
        .readings()
        .map(|p, v| fluctuate(v, p.range, p.max_step, rng));

    let mut binary_ok = previous.metrics.binary_ok();
    if rng.chance(kind.binary().toggle_probability) {
        binary_ok = !binary_ok;
        debug!(device = %kind, ok = binary_ok, "{} toggled", kind.binary().label);
    }

    let (injected, _) = maybe_inject(&fluctuated, rng);
    let (healed, healing) = apply_healing(&injected, &previous.healing);

    let metrics = MetricSet::assemble(&healed, binary_ok);
    let status = classify(&metrics, &healing);

    Ok(DeviceState {
        id: previous.id.clone(),
        kind,
        metrics,
        healing,
        status,
        last_updated: now,
    })
}
