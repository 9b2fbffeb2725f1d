//! Device metric shapes
//!
//! [`MetricSet`] is one variant per device kind, so a ventilator can never
//! be missing its pressure reading and a defibrillator never carries one.
//! [`Readings`] is the kind-agnostic view the engine computes on: the three
//! continuous values in profile order.

use crate::profile::{DeviceKind, MetricName, MetricProfile, CONTINUOUS_METRICS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirmwareStatus {
    Responsive,
    Unresponsive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacitorStatus {
    Ready,
    #[serde(rename = "Not Ready")]
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentilatorMetrics {
    pub temperature: f64,
    pub pressure: f64,
    pub oxygen_level: f64,
    pub firmware_status: FirmwareStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefibrillatorMetrics {
    pub temperature: f64,
    pub battery_voltage: f64,
    pub ecg_signal: f64,
    pub capacitor_status: CapacitorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "lowercase")]
pub enum MetricSet {
    Ventilator(VentilatorMetrics),
    Defibrillator(DefibrillatorMetrics),
}

/// Continuous values of one device, ordered like `kind.profiles()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    kind: DeviceKind,
    values: [f64; CONTINUOUS_METRICS],
}

impl FirmwareStatus {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            FirmwareStatus::Responsive
        } else {
            FirmwareStatus::Unresponsive
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, FirmwareStatus::Responsive)
    }
}

impl CapacitorStatus {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            CapacitorStatus::Ready
        } else {
            CapacitorStatus::NotReady
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CapacitorStatus::Ready)
    }
}

impl MetricSet {
    /// Builds the variant for `readings.kind()` from scratch.
    pub fn assemble(readings: &Readings, binary_ok: bool) -> Self {
        let [a, b, c] = readings.values;
        match readings.kind {
            DeviceKind::Ventilator => MetricSet::Ventilator(VentilatorMetrics {
                temperature: a,
                pressure: b,
                oxygen_level: c,
                firmware_status: FirmwareStatus::from_ok(binary_ok),
            }),
            DeviceKind::Defibrillator => MetricSet::Defibrillator(DefibrillatorMetrics {
                temperature: a,
                battery_voltage: b,
                ecg_signal: c,
                capacitor_status: CapacitorStatus::from_ok(binary_ok),
            }),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            MetricSet::Ventilator(_) => DeviceKind::Ventilator,
            MetricSet::Defibrillator(_) => DeviceKind::Defibrillator,
        }
    }

    pub fn readings(&self) -> Readings {
        match self {
            MetricSet::Ventilator(m) => Readings {
                kind: DeviceKind::Ventilator,
                values: [m.temperature, m.pressure, m.oxygen_level],
            },
            MetricSet::Defibrillator(m) => Readings {
                kind: DeviceKind::Defibrillator,
                values: [m.temperature, m.battery_voltage, m.ecg_signal],
            },
        }
    }

    /// Firmware responsive / capacitor ready.
    pub fn binary_ok(&self) -> bool {
        match self {
            MetricSet::Ventilator(m) => m.firmware_status.is_ok(),
            MetricSet::Defibrillator(m) => m.capacitor_status.is_ok(),
        }
    }

    pub fn value(&self, name: MetricName) -> Option<f64> {
        self.readings().get(name)
    }
}

impl Readings {
    /// Values in the order of `kind.profiles()`.
    pub fn new(kind: DeviceKind, values: [f64; CONTINUOUS_METRICS]) -> Self {
        Self { kind, values }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn get(&self, name: MetricName) -> Option<f64> {
        self.index_of(name).map(|i| self.values[i])
    }

    /// Copy with one metric replaced. Unknown names leave the copy unchanged.
    pub fn replace(&self, name: MetricName, value: f64) -> Self {
        let mut values = self.values;
        if let Some(i) = self.index_of(name) {
            values[i] = value;
        }
        Self { kind: self.kind, values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static MetricProfile, f64)> + '_ {
        self.kind.profiles().iter().zip(self.values.iter().copied())
    }

    /// New readings where each value is `f(profile, value)`.
    pub fn map(&self, mut f: impl FnMut(&'static MetricProfile, f64) -> f64) -> Self {
        let mut values = self.values;
        for (i, profile) in self.kind.profiles().iter().enumerate() {
            values[i] = f(profile, self.values[i]);
        }
        Self { kind: self.kind, values }
    }

    fn index_of(&self, name: MetricName) -> Option<usize> {
        self.kind.profiles().iter().position(|p| p.name == name)
    }
}
