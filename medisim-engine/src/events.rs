//! Events emitted at the orchestration boundary
//!
//! The simulation itself never talks to collaborators. When a tick changes
//! a device's status, the supervisor turns the change into a [`LogEntry`]
//! for the log feed and, on entering `alert`, an [`AlertNotice`] for the
//! technician notifier.

use crate::device::DeviceState;
use crate::metrics::MetricSet;
use crate::profile::DeviceKind;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Device name used for entries not tied to a simulated device.
pub const SYSTEM_DEVICE: &str = "system";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub device: String,
    pub message: String,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}

/// Technician notification for a device that entered `alert`. Carries the
/// full device snapshot of the tick that raised it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertNotice {
    pub kind: DeviceKind,
    pub device: String,
    pub issue: String,
    pub subject: String,
    pub body: String,
    pub state: DeviceState,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    StatusChanged(LogEntry),
    AlertRaised(AlertNotice),
}

/// Fixed log wording per device kind and status.
pub fn status_message(kind: DeviceKind, status: Status) -> &'static str {
    match (kind, status) {
        (DeviceKind::Ventilator, Status::Healing) => {
            "Ventilator self-healing initiated - adjusting parameters"
        }
        (DeviceKind::Ventilator, Status::Alert) => "Ventilator requires technician attention",
        (DeviceKind::Ventilator, Status::Emergency) => {
            "CRITICAL: Ventilator system emergency - backup system activated"
        }
        (DeviceKind::Ventilator, Status::Normal) => "Ventilator operating normally",
        (DeviceKind::Defibrillator, Status::Healing) => "Defibrillator self-correction in progress",
        (DeviceKind::Defibrillator, Status::Alert) => "Defibrillator maintenance required",
        (DeviceKind::Defibrillator, Status::Emergency) => {
            "CRITICAL: Defibrillator malfunction detected"
        }
        (DeviceKind::Defibrillator, Status::Normal) => "Defibrillator ready for use",
    }
}

/// First matching issue: a continuous metric at or past warning (profile
/// order), then a binary fault, else "Unknown Issue".
pub fn alert_issue(metrics: &MetricSet) -> &'static str {
    let kind = metrics.kind();
    metrics
        .readings()
        .iter()
        .find(|(p, v)| p.is_warning(*v))
        .map(|(p, _)| p.issue)
        .or_else(|| (!metrics.binary_ok()).then_some(kind.binary().issue))
        .unwrap_or("Unknown Issue")
}

impl LogEntry {
    pub fn new(
        device: impl Into<String>,
        message: impl Into<String>,
        status: Status,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            device: device.into(),
            message: message.into(),
            status,
            timestamp,
        }
    }

    /// First entry of every feed.
    pub fn bootstrap(timestamp: DateTime<Utc>) -> Self {
        Self::new(SYSTEM_DEVICE, "Monitoring system initialized", Status::Normal, timestamp)
    }

    pub fn for_status(kind: DeviceKind, status: Status, timestamp: DateTime<Utc>) -> Self {
        Self::new(kind.as_str(), status_message(kind, status), status, timestamp)
    }
}

impl AlertNotice {
    pub fn from_state(state: &DeviceState) -> Self {
        let device = state.kind.display_name();
        let issue = alert_issue(&state.metrics);
        let time = state.last_updated.to_rfc3339();

        Self {
            kind: state.kind,
            device: device.to_string(),
            issue: issue.to_string(),
            subject: format!("Technician Alert: {device} Issue Detected"),
            body: format!(
                "ALERT: {device} requires attention!\n\nIssue: {issue}\nTime: {time}\n\nPlease check the system immediately."
            ),
            state: state.clone(),
            timestamp: state.last_updated,
        }
    }
}

/// Events for the move from `previous` to `next`: a log entry on any status
/// change, plus an alert notice when the change lands on `alert`.
pub fn transition_events(previous: &DeviceState, next: &DeviceState) -> Vec<DeviceEvent> {
    if previous.status == next.status {
        return Vec::new();
    }

    let mut events = vec![DeviceEvent::StatusChanged(LogEntry::for_status(
        next.kind,
        next.status,
        next.last_updated,
    ))];
    if next.status == Status::Alert {
        events.push(DeviceEvent::AlertRaised(AlertNotice::from_state(next)));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HealingSet;
    use crate::metrics::{CapacitorStatus, DefibrillatorMetrics, FirmwareStatus, VentilatorMetrics};

    fn ventilator(temperature: f64, pressure: f64, oxygen_level: f64, ok: bool) -> MetricSet {
        MetricSet::Ventilator(VentilatorMetrics {
            temperature,
            pressure,
            oxygen_level,
            firmware_status: FirmwareStatus::from_ok(ok),
        })
    }

    fn state(metrics: MetricSet, status: Status) -> DeviceState {
        DeviceState {
            id: "dev".into(),
            kind: metrics.kind(),
            metrics,
            healing: HealingSet::new(),
            status,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_issue_priority() {
        assert_eq!(alert_issue(&ventilator(38.0, 36.0, 95.0, false)), "High Temperature");
        assert_eq!(alert_issue(&ventilator(30.0, 36.0, 87.0, true)), "High Pressure");
        assert_eq!(alert_issue(&ventilator(30.0, 20.0, 87.0, true)), "Low Oxygen Level");
        assert_eq!(alert_issue(&ventilator(30.0, 20.0, 95.0, false)), "Firmware Unresponsive");
        assert_eq!(alert_issue(&ventilator(30.0, 20.0, 95.0, true)), "Unknown Issue");

        let defib = MetricSet::Defibrillator(DefibrillatorMetrics {
            temperature: 33.0,
            battery_voltage: 12.0,
            ecg_signal: -0.95,
            capacitor_status: CapacitorStatus::NotReady,
        });
        assert_eq!(alert_issue(&defib), "Abnormal ECG Signal");
    }

    #[test]
    fn test_no_events_without_status_change() {
        let a = state(ventilator(30.0, 20.0, 95.0, false), Status::Alert);
        let b = state(ventilator(30.1, 20.0, 95.0, false), Status::Alert);
        assert!(transition_events(&a, &b).is_empty());
    }

    #[test]
    fn test_alert_transition_emits_log_and_notice() {
        let a = state(ventilator(30.0, 20.0, 95.0, true), Status::Normal);
        let b = state(ventilator(30.0, 20.0, 95.0, false), Status::Alert);
        let events = transition_events(&a, &b);
        assert_eq!(events.len(), 2);
        match &events[0] {
            DeviceEvent::StatusChanged(entry) => {
                assert_eq!(entry.device, "ventilator");
                assert_eq!(entry.message, "Ventilator requires technician attention");
                assert_eq!(entry.status, Status::Alert);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &events[1] {
            DeviceEvent::AlertRaised(notice) => {
                assert_eq!(notice.issue, "Firmware Unresponsive");
                assert_eq!(notice.subject, "Technician Alert: Ventilator Issue Detected");
                assert!(notice.body.contains("Issue: Firmware Unresponsive"));
                assert_eq!(notice.state, b);
                assert_eq!(notice.state.status, Status::Alert);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_emergency_transition_logs_only() {
        let a = state(ventilator(30.0, 20.0, 95.0, true), Status::Alert);
        let b = state(ventilator(30.0, 20.0, 84.0, true), Status::Emergency);
        let events = transition_events(&a, &b);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DeviceEvent::StatusChanged(e) if e.message == "CRITICAL: Ventilator system emergency - backup system activated"
        ));
    }

    #[test]
    fn test_bootstrap_entry() {
        let entry = LogEntry::bootstrap(Utc::now());
        assert_eq!(entry.device, SYSTEM_DEVICE);
        assert_eq!(entry.status, Status::Normal);
        assert_eq!(entry.message, "Monitoring system initialized");
    }
}
