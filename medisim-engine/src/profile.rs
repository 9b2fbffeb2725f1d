//! Per-device metric profiles
//!
//! Single source of truth for every threshold the engine, the alert
//! wording and the dashboards rely on: physical range, fluctuation step,
//! warning/critical lines, direction, healing target and rate, the degraded
//! injection band and the healthy seeding band.

use crate::error::SimulationError;
use crate::healing::needs_healing;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of continuous metrics tracked per device kind.
pub const CONTINUOUS_METRICS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Ventilator,
    Defibrillator,
}

/// Healing-set key of a continuous metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricName {
    Temperature,
    Pressure,
    Oxygen,
    Battery,
    Ecg,
}

/// Which side of a threshold is the bad one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher is worse (temperature, pressure).
    Rising,
    /// Lower is worse (oxygen, battery voltage).
    Falling,
    /// Larger absolute value is worse (ECG signal).
    Magnitude,
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricProfile {
    pub name: MetricName,
    pub range: Band,
    pub max_step: f64,
    pub warning: f64,
    pub critical: f64,
    pub direction: Direction,
    pub target: f64,
    pub rate: f64,
    pub degraded: Band,
    pub seed: Band,
    /// Alert wording when this metric is at or past its warning line.
    pub issue: &'static str,
}

/// The on/off status field each device carries next to its continuous metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryProfile {
    pub label: &'static str,
    pub toggle_probability: f64,
    pub initial_ok_probability: f64,
    pub issue: &'static str,
}

static VENTILATOR_PROFILES: [MetricProfile; CONTINUOUS_METRICS] = [
    MetricProfile {
        name: MetricName::Temperature,
        range: Band::new(20.0, 45.0),
        max_step: 0.3,
        warning: 38.0,
        critical: 40.0,
        direction: Direction::Rising,
        target: 36.0,
        rate: 0.5,
        degraded: Band::new(38.0, 39.5),
        seed: Band::new(25.0, 35.0),
        issue: "High Temperature",
    },
    MetricProfile {
        name: MetricName::Pressure,
        range: Band::new(5.0, 50.0),
        max_step: 0.3,
        warning: 35.0,
        critical: 40.0,
        direction: Direction::Rising,
        target: 28.0,
        rate: 0.5,
        degraded: Band::new(30.0, 34.0),
        seed: Band::new(10.0, 25.0),
        issue: "High Pressure",
    },
    MetricProfile {
        name: MetricName::Oxygen,
        range: Band::new(80.0, 100.0),
        max_step: 0.2,
        warning: 88.0,
        critical: 85.0,
        direction: Direction::Falling,
        target: 92.0,
        rate: 0.8,
        degraded: Band::new(86.0, 89.0),
        seed: Band::new(92.0, 98.0),
        issue: "Low Oxygen Level",
    },
];

static DEFIBRILLATOR_PROFILES: [MetricProfile; CONTINUOUS_METRICS] = [
    MetricProfile {
        name: MetricName::Temperature,
        range: Band::new(25.0, 50.0),
        max_step: 0.3,
        warning: 40.0,
        critical: 45.0,
        direction: Direction::Rising,
        target: 37.0,
        rate: 0.5,
        degraded: Band::new(39.0, 42.0),
        seed: Band::new(30.0, 35.0),
        issue: "High Temperature",
    },
    MetricProfile {
        name: MetricName::Battery,
        range: Band::new(8.0, 14.0),
        max_step: 0.15,
        warning: 10.5,
        critical: 10.0,
        direction: Direction::Falling,
        target: 11.5,
        rate: 0.3,
        degraded: Band::new(10.2, 10.8),
        seed: Band::new(12.0, 13.5),
        issue: "Low Battery",
    },
    MetricProfile {
        name: MetricName::Ecg,
        range: Band::new(-1.0, 1.0),
        max_step: 0.2,
        warning: 0.9,
        critical: 1.0,
        direction: Direction::Magnitude,
        target: 0.0,
        rate: 0.2,
        degraded: Band::new(0.9, 1.0),
        seed: Band::new(-0.8, 0.8),
        issue: "Abnormal ECG Signal",
    },
];

static VENTILATOR_FIRMWARE: BinaryProfile = BinaryProfile {
    label: "Firmware Status",
    toggle_probability: 0.03,
    initial_ok_probability: 0.9,
    issue: "Firmware Unresponsive",
};

static DEFIBRILLATOR_CAPACITOR: BinaryProfile = BinaryProfile {
    label: "Capacitor Status",
    toggle_probability: 0.05,
    initial_ok_probability: 0.9,
    issue: "Capacitor Not Ready",
};

impl DeviceKind {
    pub const ALL: [DeviceKind; 2] = [DeviceKind::Ventilator, DeviceKind::Defibrillator];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Ventilator => "ventilator",
            DeviceKind::Defibrillator => "defibrillator",
        }
    }

    /// Capitalised name used in log and alert wording.
    pub fn display_name(&self) -> &'static str {
        match self {
            DeviceKind::Ventilator => "Ventilator",
            DeviceKind::Defibrillator => "Defibrillator",
        }
    }

    /// Continuous metric profiles, in the order [`crate::Readings`] stores them.
    pub fn profiles(&self) -> &'static [MetricProfile; CONTINUOUS_METRICS] {
        match self {
            DeviceKind::Ventilator => &VENTILATOR_PROFILES,
            DeviceKind::Defibrillator => &DEFIBRILLATOR_PROFILES,
        }
    }

    pub fn profile(&self, name: MetricName) -> Option<&'static MetricProfile> {
        self.profiles().iter().find(|p| p.name == name)
    }

    pub fn binary(&self) -> &'static BinaryProfile {
        match self {
            DeviceKind::Ventilator => &VENTILATOR_FIRMWARE,
            DeviceKind::Defibrillator => &DEFIBRILLATOR_CAPACITOR,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ventilator" => Ok(DeviceKind::Ventilator),
            "defibrillator" => Ok(DeviceKind::Defibrillator),
            _ => Err(SimulationError::UnknownKind(s.to_string())),
        }
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Temperature => "temperature",
            MetricName::Pressure => "pressure",
            MetricName::Oxygen => "oxygen",
            MetricName::Battery => "battery",
            MetricName::Ecg => "ecg",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    /// The quantity thresholds are compared against.
    pub fn reading(self, value: f64) -> f64 {
        match self {
            Direction::Magnitude => value.abs(),
            Direction::Rising | Direction::Falling => value,
        }
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::Falling)
    }

    /// Whether `value` sits on or beyond `threshold` on the bad side.
    pub fn at_or_past(self, value: f64, threshold: f64) -> bool {
        let reading = self.reading(value);
        if self.is_reversed() {
            reading <= threshold
        } else {
            reading >= threshold
        }
    }

    /// Whether `value` is strictly worse than `reference`.
    pub fn is_worse(self, value: f64, reference: f64) -> bool {
        let (a, b) = (self.reading(value), self.reading(reference));
        if self.is_reversed() {
            a < b
        } else {
            a > b
        }
    }
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl MetricProfile {
    pub fn needs_healing(&self, value: f64) -> bool {
        needs_healing(
            self.direction.reading(value),
            self.warning,
            self.critical,
            self.direction.is_reversed(),
        )
    }

    pub fn is_critical(&self, value: f64) -> bool {
        self.direction.at_or_past(value, self.critical)
    }

    pub fn is_warning(&self, value: f64) -> bool {
        self.direction.at_or_past(value, self.warning)
    }

    /// Still on the unhealthy side of the healing target.
    pub fn short_of_target(&self, value: f64) -> bool {
        self.direction.is_worse(value, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_self_consistent() {
        for kind in DeviceKind::ALL {
            for p in kind.profiles() {
                assert!(p.range.min < p.range.max, "{kind}/{}", p.name);
                assert!(p.range.contains(p.target), "{kind}/{} target", p.name);
                assert!(p.range.contains(p.seed.min) && p.range.contains(p.seed.max));
                assert!(p.range.contains(p.degraded.min) && p.range.contains(p.degraded.max));
                assert!(!p.is_warning(p.target), "{kind}/{} target must be healthy", p.name);
                assert!(p.rate >= p.max_step, "{kind}/{} heals slower than it drifts", p.name);
            }
        }
    }

    #[test]
    fn test_direction_thresholds() {
        assert!(Direction::Rising.at_or_past(40.0, 40.0));
        assert!(!Direction::Rising.at_or_past(39.9, 40.0));
        assert!(Direction::Falling.at_or_past(85.0, 85.0));
        assert!(!Direction::Falling.at_or_past(85.1, 85.0));
        assert!(Direction::Magnitude.at_or_past(-1.0, 1.0));
        assert!(!Direction::Magnitude.at_or_past(-0.8, 0.9));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Ventilator".parse::<DeviceKind>().unwrap(), DeviceKind::Ventilator);
        assert_eq!("defibrillator".parse::<DeviceKind>().unwrap(), DeviceKind::Defibrillator);
        assert!(matches!(
            "infusion-pump".parse::<DeviceKind>(),
            Err(SimulationError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_metric_lookup_is_kind_specific() {
        assert!(DeviceKind::Ventilator.profile(MetricName::Oxygen).is_some());
        assert!(DeviceKind::Ventilator.profile(MetricName::Battery).is_none());
        assert!(DeviceKind::Defibrillator.profile(MetricName::Ecg).is_some());
        assert!(DeviceKind::Defibrillator.profile(MetricName::Pressure).is_none());
    }
}
