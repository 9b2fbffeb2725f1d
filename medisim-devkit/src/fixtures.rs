/*!
Device states with chosen readings

Status is classified from the readings with an empty healing set, so a
fixture is always a state the engine itself could have produced.
*/

use chrono::Utc;
use medisim_engine::{
    classify, CapacitorStatus, DefibrillatorMetrics, DeviceKind, DeviceState, FirmwareStatus,
    HealingSet, MetricName, MetricSet, VentilatorMetrics,
};

fn build(kind: DeviceKind, metrics: MetricSet) -> DeviceState {
    let healing = HealingSet::new();
    DeviceState {
        id: format!("{kind}-fixture"),
        kind,
        status: classify(&metrics, &healing),
        metrics,
        healing,
        last_updated: Utc::now(),
    }
}

pub fn ventilator(temperature: f64, pressure: f64, oxygen_level: f64, firmware_ok: bool) -> DeviceState {
    build(
        DeviceKind::Ventilator,
        MetricSet::Ventilator(VentilatorMetrics {
            temperature,
            pressure,
            oxygen_level,
            firmware_status: FirmwareStatus::from_ok(firmware_ok),
        }),
    )
}

pub fn defibrillator(temperature: f64, battery_voltage: f64, ecg_signal: f64, capacitor_ok: bool) -> DeviceState {
    build(
        DeviceKind::Defibrillator,
        MetricSet::Defibrillator(DefibrillatorMetrics {
            temperature,
            battery_voltage,
            ecg_signal,
            capacitor_status: CapacitorStatus::from_ok(capacitor_ok),
        }),
    )
}

/// Healthy ventilator: temperature 30, pressure 20, oxygen 95.
pub fn healthy_ventilator() -> DeviceState {
    ventilator(30.0, 20.0, 95.0, true)
}

/// Healthy defibrillator: temperature 33, battery 12.5, ECG flat.
pub fn healthy_defibrillator() -> DeviceState {
    defibrillator(33.0, 12.5, 0.0, true)
}

/// Marks metrics as already healing and reclassifies.
pub fn with_healing(mut state: DeviceState, metrics: &[MetricName]) -> DeviceState {
    state.healing.extend(metrics.iter().copied());
    state.status = classify(&state.metrics, &state.healing);
    state
}
