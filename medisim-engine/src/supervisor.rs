use crate::device::DeviceState;
use crate::error::SimulationError;
use crate::events::{transition_events, DeviceEvent};
use crate::profile::DeviceKind;
use crate::random::RandomSource;
use crate::step::{create_initial, step};
use chrono::{DateTime, Utc};
use tracing::info;

/// Result of one supervised tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub state: DeviceState,
    pub events: Vec<DeviceEvent>,
}

/// Holds one device's latest state and its random source, and reports
/// status transitions as events. Alerts are edge-triggered: a device that
/// stays in `alert` raises one notice, not one per tick.
pub struct DeviceSupervisor<R> {
    kind: DeviceKind,
    state: DeviceState,
    rng: R,
}

impl<R: RandomSource> DeviceSupervisor<R> {
    pub fn new(kind: DeviceKind, mut rng: R, now: DateTime<Utc>) -> Self {
        let state = create_initial(kind, &mut rng, now);
        info!(device = %kind, id = %state.id, "device simulation started");
        Self { kind, state, rng }
    }

    /// Continues from an existing state.
    pub fn resume(state: DeviceState, rng: R) -> Result<Self, SimulationError> {
        let kind = state.kind;
        state.validate(kind)?;
        Ok(Self { kind, state, rng })
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, SimulationError> {
        let next = step(self.kind, &self.state, &mut self.rng, now)?;
        let events = transition_events(&self.state, &next);
        if !events.is_empty() {
            info!(device = %self.kind, from = %self.state.status, to = %next.status, "status changed");
        }
        self.state = next.clone();
        Ok(TickOutcome { state: next, events })
    }
}
