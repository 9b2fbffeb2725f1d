use crate::metrics::Readings;
use crate::profile::MetricName;
use crate::random::{sample, RandomSource};
use tracing::debug;

/// Per-tick probability of forcing a degraded excursion.
pub const PROBLEM_PROBABILITY: f64 = 0.1;

/// With probability [`PROBLEM_PROBABILITY`], overwrites one uniformly chosen
/// metric with a value from its degraded band so the healing path gets
/// exercised. Returns the injected metric, if any.
pub fn maybe_inject<R: RandomSource + ?Sized>(
    readings: &Readings,
    rng: &mut R,
) -> (Readings, Option<MetricName>) {
    if !rng.chance(PROBLEM_PROBABILITY) {
        return (*readings, None);
    }

    let profiles = readings.kind().profiles();
    let profile = &profiles[rng.pick(profiles.len())];
    let value = sample(rng, profile.degraded.min, profile.degraded.max, 1);
    debug!(device = %readings.kind(), metric = %profile.name, value, "injected degraded reading");

    (readings.replace(profile.name, value), Some(profile.name))
}
