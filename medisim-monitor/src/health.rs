use crate::state::{DeviceBoard, Shared};
use medisim_engine::Status;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorHealth {
    pub uptime_seconds: u64,
    pub ticks: u64,
    pub devices_tracked: u32,
    pub device_status: BTreeMap<String, Status>,
    pub alerts_sent: u64,
    pub notifier_failures: u64,
    pub sink_failures: u64,
    pub mqtt_status: String,
    pub mqtt_reconnects: u32,
}

/// Process-wide counters, cheap to clone into spawned tasks.
#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
    ticks: Arc<AtomicU64>,
    alerts_sent: Arc<AtomicU64>,
    notifier_failures: Arc<AtomicU64>,
    sink_failures: Arc<AtomicU64>,
    mqtt_reconnects: Arc<AtomicU32>,
    mqtt_status: Arc<Mutex<String>>,
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            ticks: Arc::new(AtomicU64::new(0)),
            alerts_sent: Arc::new(AtomicU64::new(0)),
            notifier_failures: Arc::new(AtomicU64::new(0)),
            sink_failures: Arc::new(AtomicU64::new(0)),
            mqtt_reconnects: Arc::new(AtomicU32::new(0)),
            mqtt_status: Arc::new(Mutex::new("disabled".to_string())),
        }
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_sent(&self) {
        self.alerts_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notifier_failure(&self) {
        self.notifier_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_mqtt_connecting(&self) {
        *self.mqtt_status.lock() = "connecting".to_string();
    }

    pub fn mark_mqtt_connected(&self) {
        *self.mqtt_status.lock() = "connected".to_string();
    }

    pub fn increment_reconnects(&self) {
        self.mqtt_reconnects.fetch_add(1, Ordering::Relaxed);
        *self.mqtt_status.lock() = "reconnecting".to_string();
    }

    pub fn get_health(&self, board: &Shared<DeviceBoard>) -> MonitorHealth {
        let device_status: BTreeMap<String, Status> = board
            .lock()
            .iter()
            .map(|(kind, state)| (kind.to_string(), state.status))
            .collect();

        MonitorHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            ticks: self.ticks.load(Ordering::Relaxed),
            devices_tracked: device_status.len() as u32,
            device_status,
            alerts_sent: self.alerts_sent.load(Ordering::Relaxed),
            notifier_failures: self.notifier_failures.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
            mqtt_status: self.mqtt_status.lock().clone(),
            mqtt_reconnects: self.mqtt_reconnects.load(Ordering::Relaxed),
        }
    }
}
