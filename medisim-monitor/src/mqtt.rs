use crate::config::MqttConf;
use crate::health::HealthTracker;
use medisim_engine::DeviceState;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use std::time::Duration;
use tokio::task;
use tracing::{info, warn};

/// Creates the broker client and spawns its event loop. The loop only
/// tracks connection health; the monitor never subscribes.
pub fn connect(conf: &MqttConf, health: HealthTracker) -> AsyncClient {
    let mut opts = MqttOptions::new(conf.client_id.as_str(), conf.host.as_str(), conf.port);
    opts.set_keep_alive(Duration::from_secs(15));
    let (client, mut eventloop) = AsyncClient::new(opts, 10);
    health.mark_mqtt_connecting();

    let broker = format!("{}:{}", conf.host, conf.port);
    task::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    health.mark_mqtt_connected();
                    info!(%broker, "mqtt connected");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(%broker, "mqtt error: {e}");
                    health.increment_reconnects();
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });

    client
}

/// Publishes every ticked device state. Uses the non-blocking path: a full
/// request queue drops the sample instead of stalling the tick.
#[derive(Clone)]
pub struct TelemetryPublisher {
    client: AsyncClient,
    topic: String,
}

impl TelemetryPublisher {
    pub fn new(client: AsyncClient, topic: impl Into<String>) -> Self {
        Self { client, topic: topic.into() }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn publish(&self, state: &DeviceState) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(state)?;
        self.client.try_publish(self.topic.as_str(), QoS::AtMostOnce, false, payload)?;
        Ok(())
    }
}
