use crate::health::HealthTracker;
use anyhow::Context;
use futures::future::{self, BoxFuture, FutureExt};
use medisim_engine::AlertNotice;
use rumqttc::{AsyncClient, QoS};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Delivers technician alerts. Delivery runs detached from the tick, so an
/// implementation may be slow or fail without affecting device state.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn notify(&self, notice: AlertNotice) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// Writes alerts to the tracing output.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, notice: AlertNotice) -> BoxFuture<'static, anyhow::Result<()>> {
        warn!(device = %notice.kind, id = %notice.state.id, issue = %notice.issue, "{}", notice.subject);
        future::ready(Ok(())).boxed()
    }
}

/// Publishes alerts as JSON on a broker topic.
#[derive(Clone)]
pub struct MqttNotifier {
    client: AsyncClient,
    topic: String,
}

impl MqttNotifier {
    pub fn new(client: AsyncClient, topic: impl Into<String>) -> Self {
        Self { client, topic: topic.into() }
    }
}

impl Notifier for MqttNotifier {
    fn name(&self) -> &'static str {
        "mqtt"
    }

    fn notify(&self, notice: AlertNotice) -> BoxFuture<'static, anyhow::Result<()>> {
        let client = self.client.clone();
        let topic = self.topic.clone();
        async move {
            let payload = serde_json::to_vec(&notice).context("serialize alert notice")?;
            client
                .publish(topic.as_str(), QoS::AtLeastOnce, false, payload)
                .await
                .with_context(|| format!("publish alert on {topic}"))?;
            Ok(())
        }
        .boxed()
    }
}

/// Sends `notice` on a spawned task and records the outcome.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    notice: AlertNotice,
    health: HealthTracker,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let kind = notice.kind;
        let issue = notice.issue.clone();
        match notifier.notify(notice).await {
            Ok(()) => {
                health.record_alert_sent();
                info!(device = %kind, notifier = notifier.name(), %issue, "technician alert sent");
            }
            Err(e) => {
                health.record_notifier_failure();
                warn!(device = %kind, notifier = notifier.name(), "alert delivery failed: {e:#}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{new_state, DeviceBoard};
    use chrono::Utc;
    use medisim_engine::{
        DeviceKind, DeviceState, FirmwareStatus, HealingSet, MetricSet, Status, VentilatorMetrics,
    };

    struct Broken;

    impl Notifier for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn notify(&self, _notice: AlertNotice) -> BoxFuture<'static, anyhow::Result<()>> {
            future::ready(Err(anyhow::anyhow!("smtp unreachable"))).boxed()
        }
    }

    fn notice() -> AlertNotice {
        AlertNotice::from_state(&DeviceState {
            id: "ventilator-1".into(),
            kind: DeviceKind::Ventilator,
            metrics: MetricSet::Ventilator(VentilatorMetrics {
                temperature: 30.0,
                pressure: 20.0,
                oxygen_level: 95.0,
                firmware_status: FirmwareStatus::Unresponsive,
            }),
            healing: HealingSet::new(),
            status: Status::Alert,
            last_updated: Utc::now(),
        })
    }

    #[test]
    fn test_notice_carries_device_snapshot() {
        let notice = notice();
        assert_eq!(notice.kind, DeviceKind::Ventilator);
        assert_eq!(notice.state.id, "ventilator-1");
        assert_eq!(notice.state.status, Status::Alert);
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["state"]["metrics"]["firmwareStatus"], "Unresponsive");
    }

    #[tokio::test]
    async fn test_dispatch_counts_success() {
        let health = HealthTracker::new();
        dispatch(Arc::new(LogNotifier), notice(), health.clone()).await.unwrap();
        let snapshot = health.get_health(&new_state(DeviceBoard::new()));
        assert_eq!(snapshot.alerts_sent, 1);
        assert_eq!(snapshot.notifier_failures, 0);
    }

    #[tokio::test]
    async fn test_dispatch_absorbs_failure() {
        let health = HealthTracker::new();
        dispatch(Arc::new(Broken), notice(), health.clone()).await.unwrap();
        let snapshot = health.get_health(&new_state(DeviceBoard::new()));
        assert_eq!(snapshot.alerts_sent, 0);
        assert_eq!(snapshot.notifier_failures, 1);
    }
}
