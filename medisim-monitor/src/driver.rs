/**
 * Periodic tick driver
 *
 * Owns one supervisor per simulated device and advances all of them on a
 * fixed interval. Each tick:
 * 1. steps every device and publishes the new state to the shared board
 * 2. forwards status-change entries to the log sink
 * 3. hands alert notices to the notifier on detached tasks
 *
 * Sink, notifier and telemetry failures are logged and counted; they never
 * change device state or stop the loop.
 */

use crate::feed::LogSink;
use crate::health::HealthTracker;
use crate::mqtt::TelemetryPublisher;
use crate::notifier::{dispatch, Notifier};
use crate::state::{new_state, DeviceBoard, Shared};
use chrono::{DateTime, Utc};
use medisim_engine::{DeviceEvent, DeviceKind, DeviceSupervisor, RandomSource, RngSource};
use rand::rngs::StdRng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub type SeededSupervisor = DeviceSupervisor<RngSource<StdRng>>;

/// One supervisor per device kind. With a seed, device `i` draws from
/// `seed + i` so runs are reproducible; otherwise from OS entropy.
pub fn build_supervisors(seed: Option<u64>, now: DateTime<Utc>) -> Vec<SeededSupervisor> {
    DeviceKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let rng = match seed {
                Some(seed) => RngSource::seeded(seed.wrapping_add(i as u64)),
                None => RngSource::from_entropy(),
            };
            DeviceSupervisor::new(*kind, rng, now)
        })
        .collect()
}

pub struct Simulation<R> {
    supervisors: Vec<DeviceSupervisor<R>>,
    board: Shared<DeviceBoard>,
    sink: Arc<dyn LogSink>,
    notifier: Arc<dyn Notifier>,
    telemetry: Option<TelemetryPublisher>,
    health: HealthTracker,
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(
        supervisors: Vec<DeviceSupervisor<R>>,
        sink: Arc<dyn LogSink>,
        notifier: Arc<dyn Notifier>,
        health: HealthTracker,
    ) -> Self {
        let board: DeviceBoard = supervisors
            .iter()
            .map(|sup| (sup.kind(), sup.state().clone()))
            .collect();
        Self {
            supervisors,
            board: new_state(board),
            sink,
            notifier,
            telemetry: None,
            health,
        }
    }

    pub fn with_telemetry(mut self, telemetry: TelemetryPublisher) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn board(&self) -> Shared<DeviceBoard> {
        self.board.clone()
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    /// Advances every device once. Returns the handles of alert deliveries
    /// started by this tick; callers may await them or let them run.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<JoinHandle<()>> {
        self.health.record_tick();
        let mut deliveries = Vec::new();

        for sup in &mut self.supervisors {
            let outcome = match sup.tick(now) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(device = %sup.kind(), "tick rejected: {e}");
                    continue;
                }
            };

            if let Some(telemetry) = &self.telemetry {
                if let Err(e) = telemetry.publish(&outcome.state) {
                    debug!(device = %sup.kind(), "telemetry dropped: {e}");
                }
            }
            self.board.lock().insert(sup.kind(), outcome.state);

            for event in outcome.events {
                match event {
                    DeviceEvent::StatusChanged(entry) => {
                        if let Err(e) = self.sink.record(entry) {
                            self.health.record_sink_failure();
                            warn!(device = %sup.kind(), "log sink failed: {e:#}");
                        }
                    }
                    DeviceEvent::AlertRaised(notice) => {
                        deliveries.push(dispatch(self.notifier.clone(), notice, self.health.clone()));
                    }
                }
            }
        }

        deliveries
    }

    /// Ticks every `period` until `shutdown` resolves. The first tick fires
    /// one full period after start.
    pub async fn run<F>(&mut self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        tokio::pin!(shutdown);

        info!(devices = self.supervisors.len(), period_secs = period.as_secs(), "simulation running");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(Utc::now());
                },
                _ = &mut shutdown => {
                    info!("simulation stopped");
                    break;
                }
            }
        }
    }
}
