use crate::device::HealingSet;
use crate::metrics::MetricSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating state derived from metrics and the healing set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Healing,
    Alert,
    Emergency,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Healing => "healing",
            Status::Alert => "alert",
            Status::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a device, first match wins:
///
/// 1. `Emergency` - any metric at or past its critical line, healing or not
/// 2. `Alert` - a metric at or past warning that is not healing, or the
///    binary status field in its bad state
/// 3. `Healing` - anything in the healing set
/// 4. `Normal`
pub fn classify(metrics: &MetricSet, healing: &HealingSet) -> Status {
    let readings = metrics.readings();

    if readings.iter().any(|(p, v)| p.is_critical(v)) {
        return Status::Emergency;
    }

    let unattended = readings
        .iter()
        .any(|(p, v)| p.is_warning(v) && !healing.contains(&p.name));
    if unattended || !metrics.binary_ok() {
        return Status::Alert;
    }

    if !healing.is_empty() {
        return Status::Healing;
    }

    Status::Normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        CapacitorStatus, DefibrillatorMetrics, FirmwareStatus, VentilatorMetrics,
    };
    use crate::profile::MetricName;

    fn ventilator(temperature: f64, pressure: f64, oxygen_level: f64, ok: bool) -> MetricSet {
        MetricSet::Ventilator(VentilatorMetrics {
            temperature,
            pressure,
            oxygen_level,
            firmware_status: FirmwareStatus::from_ok(ok),
        })
    }

    fn defibrillator(temperature: f64, battery: f64, ecg: f64, ok: bool) -> MetricSet {
        MetricSet::Defibrillator(DefibrillatorMetrics {
            temperature,
            battery_voltage: battery,
            ecg_signal: ecg,
            capacitor_status: CapacitorStatus::from_ok(ok),
        })
    }

    #[test]
    fn test_low_oxygen_is_emergency_even_while_healing() {
        let healing = HealingSet::from([MetricName::Temperature]);
        assert_eq!(classify(&ventilator(38.5, 20.0, 84.0, true), &healing), Status::Emergency);
        let healing = HealingSet::from([MetricName::Oxygen]);
        assert_eq!(classify(&ventilator(30.0, 20.0, 85.0, true), &healing), Status::Emergency);
    }

    #[test]
    fn test_emergency_beats_binary_fault() {
        let m = defibrillator(33.0, 12.0, -1.0, false);
        assert_eq!(classify(&m, &HealingSet::new()), Status::Emergency);
    }

    #[test]
    fn test_capacitor_not_ready_is_alert() {
        let m = defibrillator(33.0, 12.5, 0.1, false);
        assert_eq!(classify(&m, &HealingSet::new()), Status::Alert);
    }

    #[test]
    fn test_warning_is_masked_only_by_its_own_healing() {
        let m = ventilator(38.2, 20.0, 95.0, true);
        assert_eq!(classify(&m, &HealingSet::new()), Status::Alert);
        assert_eq!(classify(&m, &HealingSet::from([MetricName::Pressure])), Status::Alert);
        assert_eq!(classify(&m, &HealingSet::from([MetricName::Temperature])), Status::Healing);
    }

    #[test]
    fn test_binary_fault_not_masked_by_healing() {
        let m = ventilator(37.5, 20.0, 95.0, false);
        assert_eq!(classify(&m, &HealingSet::from([MetricName::Temperature])), Status::Alert);
    }

    #[test]
    fn test_healing_and_normal() {
        let m = ventilator(37.5, 20.0, 95.0, true);
        assert_eq!(classify(&m, &HealingSet::from([MetricName::Temperature])), Status::Healing);
        assert_eq!(classify(&m, &HealingSet::new()), Status::Normal);
        let d = defibrillator(33.0, 12.5, 0.0, true);
        assert_eq!(classify(&d, &HealingSet::new()), Status::Normal);
    }

    #[test]
    fn test_ecg_uses_absolute_value() {
        let m = defibrillator(33.0, 12.5, -0.9, true);
        assert_eq!(classify(&m, &HealingSet::new()), Status::Alert);
        assert_eq!(classify(&m, &HealingSet::from([MetricName::Ecg])), Status::Healing);
    }
}
