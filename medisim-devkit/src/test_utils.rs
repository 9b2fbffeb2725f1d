/*!
Test harness for the monitor

Drives a [`Simulation`] whose devices draw from a constant scripted source
(0.5): fluctuation deltas are zero and no random toggle or injection ever
fires, so each tick only applies healing and classification. Alert
deliveries are awaited before `tick` returns.
*/

use crate::notifier_stub::{FailingNotifier, FailingSink, RecordingNotifier};
use anyhow::{Context, Result};
use chrono::Utc;
use medisim_engine::{AlertNotice, DeviceKind, DeviceState, DeviceSupervisor, LogEntry, ScriptedSource};
use medisim_monitor::health::MonitorHealth;
use medisim_monitor::state::{new_state, Shared};
use medisim_monitor::{HealthTracker, LogFeed, LogSink, Notifier, Simulation};
use std::sync::Arc;

pub struct TestHarness {
    pub simulation: Simulation<ScriptedSource>,
    pub feed: Shared<LogFeed>,
    pub notifier: RecordingNotifier,
    health: HealthTracker,
}

impl TestHarness {
    /// Simulation over `states` with the in-memory feed and a recording
    /// notifier.
    pub fn new(states: Vec<DeviceState>) -> Result<Self> {
        let feed = new_state(LogFeed::new(50, Utc::now()));
        let notifier = RecordingNotifier::new();
        Self::build(states, Arc::new(feed.clone()), Arc::new(notifier.clone()), feed, notifier)
    }

    /// Simulation whose sink and notifier reject everything.
    pub fn failing(states: Vec<DeviceState>) -> Result<Self> {
        let feed = new_state(LogFeed::new(50, Utc::now()));
        Self::build(states, Arc::new(FailingSink), Arc::new(FailingNotifier), feed, RecordingNotifier::new())
    }

    fn build(
        states: Vec<DeviceState>,
        sink: Arc<dyn LogSink>,
        notifier: Arc<dyn Notifier>,
        feed: Shared<LogFeed>,
        recorder: RecordingNotifier,
    ) -> Result<Self> {
        init_tracing();
        let supervisors = states
            .into_iter()
            .map(|state| {
                let kind = state.kind;
                DeviceSupervisor::resume(state, ScriptedSource::constant(0.5))
                    .with_context(|| format!("resume {kind}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let health = HealthTracker::new();
        Ok(Self {
            simulation: Simulation::new(supervisors, sink, notifier, health.clone()),
            feed,
            notifier: recorder,
            health,
        })
    }

    /// One tick, waiting for every alert delivery it started.
    pub async fn tick(&mut self) -> Result<()> {
        for delivery in self.simulation.tick(Utc::now()) {
            delivery.await.context("alert delivery task panicked")?;
        }
        Ok(())
    }

    pub async fn ticks(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.tick().await?;
        }
        Ok(())
    }

    pub fn state(&self, kind: DeviceKind) -> Result<DeviceState> {
        self.simulation
            .board()
            .lock()
            .get(&kind)
            .cloned()
            .with_context(|| format!("no {kind} on the board"))
    }

    /// Feed entries after the bootstrap one, oldest first.
    pub fn logged(&self) -> Vec<LogEntry> {
        let mut entries = self.feed.lock().entries();
        entries.pop();
        entries.reverse();
        entries
    }

    pub fn notices(&self) -> Vec<AlertNotice> {
        self.notifier.notices()
    }

    pub fn health(&self) -> MonitorHealth {
        self.health.get_health(&self.simulation.board())
    }
}

fn init_tracing() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();
}
