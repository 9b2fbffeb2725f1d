//! Self-healing
//!
//! A metric is caught for healing inside a widened pre-alert band (one unit
//! before the warning line, strictly before the critical line). While it is
//! in the band it moves toward its healthy target at a fixed rate per tick.
//! It stops healing, and leaves the healing set, on the first tick it is
//! outside the band. Past the critical line no healing applies.

use crate::device::HealingSet;
use crate::metrics::Readings;
use crate::random::round_to;
use tracing::trace;

/// Recoverable-but-abnormal band test.
///
/// Non-reversed (higher is worse): `warning - 1 <= value < critical`.
/// Reversed (lower is worse): `critical < value <= warning + 1`.
pub fn needs_healing(value: f64, warning: f64, critical: f64, reversed: bool) -> bool {
    if reversed {
        value <= warning + 1.0 && value > critical
    } else {
        value >= warning - 1.0 && value < critical
    }
}

/// Moves `value` toward `target` by `rate` without overshooting.
pub fn heal_toward(value: f64, target: f64, rate: f64) -> f64 {
    let healed = if value < target {
        (value + rate).min(target)
    } else if value > target {
        (value - rate).max(target)
    } else {
        value
    };
    round_to(healed, 1)
}

/// Applies one healing step to every continuous metric.
///
/// Only metrics that need healing this tick are moved, and only those stay
/// in the returned set. A metric that has left the band (recovered or gone
/// critical) drops out on the same tick, as does one that lands exactly on
/// its target.
pub fn apply_healing(readings: &Readings, previous: &HealingSet) -> (Readings, HealingSet) {
    let mut next = HealingSet::new();

    let healed = readings.map(|profile, value| {
        if !profile.needs_healing(value) {
            if previous.contains(&profile.name) {
                trace!(metric = %profile.name, value, "left healing band");
            }
            return value;
        }

        let healed = heal_toward(value, profile.target, profile.rate);
        if profile.short_of_target(healed) {
            next.insert(profile.name);
        }
        trace!(metric = %profile.name, from = value, to = healed, "healing step");
        healed
    });

    (healed, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DeviceKind, MetricName};

    fn ventilator(temperature: f64, pressure: f64, oxygen: f64) -> Readings {
        Readings::new(DeviceKind::Ventilator, [temperature, pressure, oxygen])
    }

    #[test]
    fn test_needs_healing_bands() {
        // higher is worse: warning 38, critical 40
        assert!(!needs_healing(36.9, 38.0, 40.0, false));
        assert!(needs_healing(37.0, 38.0, 40.0, false));
        assert!(needs_healing(39.9, 38.0, 40.0, false));
        assert!(!needs_healing(40.0, 38.0, 40.0, false));

        // lower is worse: warning 88, critical 85
        assert!(!needs_healing(89.1, 88.0, 85.0, true));
        assert!(needs_healing(89.0, 88.0, 85.0, true));
        assert!(needs_healing(85.1, 88.0, 85.0, true));
        assert!(!needs_healing(85.0, 88.0, 85.0, true));
    }

    #[test]
    fn test_heal_toward_never_overshoots() {
        assert_eq!(heal_toward(39.0, 36.0, 0.5), 38.5);
        assert_eq!(heal_toward(36.3, 36.0, 0.5), 36.0);
        assert_eq!(heal_toward(91.5, 92.0, 0.8), 92.0);
        assert_eq!(heal_toward(-0.9, 0.0, 0.2), -0.7);
        assert_eq!(heal_toward(28.0, 28.0, 0.5), 28.0);
    }

    #[test]
    fn test_temperature_recovers_to_target() {
        let mut readings = ventilator(39.0, 20.0, 95.0);
        let mut healing = HealingSet::new();

        let (r, h) = apply_healing(&readings, &healing);
        assert_eq!(r.get(MetricName::Temperature), Some(38.5));
        assert!(h.contains(&MetricName::Temperature));
        readings = r;
        healing = h;

        let mut trail = vec![38.5];
        for _ in 0..5 {
            let (r, h) = apply_healing(&readings, &healing);
            readings = r;
            healing = h;
            trail.push(readings.get(MetricName::Temperature).unwrap());
        }
        // 36.5 is below the band (37.0), so healing stops there
        assert_eq!(trail, vec![38.5, 38.0, 37.5, 37.0, 36.5, 36.5]);
        assert!(healing.is_empty());
    }

    #[test]
    fn test_pressure_leaves_set_when_band_exited() {
        let profile = DeviceKind::Ventilator.profile(MetricName::Pressure).unwrap();
        let mut readings = ventilator(30.0, 34.0, 95.0);
        let mut healing = HealingSet::new();
        let mut ticks_in_set = 0;

        for _ in 0..14 {
            let before = readings.get(MetricName::Pressure).unwrap();
            let (r, h) = apply_healing(&readings, &healing);
            if h.contains(&MetricName::Pressure) {
                ticks_in_set += 1;
                assert!(profile.needs_healing(before), "healing outside band at {before}");
            }
            readings = r;
            healing = h;
        }

        assert_eq!(ticks_in_set, 1);
        assert_eq!(readings.get(MetricName::Pressure), Some(33.5));
        assert!(healing.is_empty());
    }

    #[test]
    fn test_battery_leaves_set_on_reaching_target() {
        let mut readings = Readings::new(DeviceKind::Defibrillator, [33.0, 10.8, 0.0]);
        let mut healing = HealingSet::new();
        let mut trail = Vec::new();
        let mut membership = Vec::new();
        for _ in 0..4 {
            let (r, h) = apply_healing(&readings, &healing);
            readings = r;
            healing = h;
            trail.push(readings.get(MetricName::Battery).unwrap());
            membership.push(healing.contains(&MetricName::Battery));
        }
        assert_eq!(trail, vec![11.1, 11.4, 11.5, 11.5]);
        assert_eq!(membership, vec![true, true, false, false]);
    }

    #[test]
    fn test_critical_metric_is_not_healed() {
        let (r, h) = apply_healing(&ventilator(30.0, 20.0, 84.0), &HealingSet::new());
        assert_eq!(r.get(MetricName::Oxygen), Some(84.0));
        assert!(h.is_empty());

        // a metric that went critical while healing drops out of the set
        let healing = HealingSet::from([MetricName::Pressure]);
        let (r, h) = apply_healing(&ventilator(30.0, 41.0, 95.0), &healing);
        assert_eq!(r.get(MetricName::Pressure), Some(41.0));
        assert!(!h.contains(&MetricName::Pressure));
    }

    #[test]
    fn test_recovered_metric_leaves_set() {
        let healing = HealingSet::from([MetricName::Oxygen]);
        let (r, h) = apply_healing(&ventilator(30.0, 20.0, 93.0), &healing);
        assert_eq!(r.get(MetricName::Oxygen), Some(93.0));
        assert!(h.is_empty());
    }

    #[test]
    fn test_ecg_heals_by_magnitude() {
        let readings = Readings::new(DeviceKind::Defibrillator, [33.0, 12.0, -0.9]);
        let (r, h) = apply_healing(&readings, &HealingSet::new());
        assert_eq!(r.get(MetricName::Ecg), Some(-0.7));
        assert!(h.contains(&MetricName::Ecg));
    }

    #[test]
    fn test_healthy_metrics_untouched() {
        let readings = ventilator(30.0, 20.0, 95.0);
        let (r, h) = apply_healing(&readings, &HealingSet::new());
        assert_eq!(r, readings);
        assert!(h.is_empty());
    }
}
