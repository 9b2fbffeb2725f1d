/*!
# MediSim DevKit - stubs and helpers for testing the simulation

- Ready-made device states (`fixtures`)
- Recording and failing collaborators (`notifier_stub`)
- A harness that drives the monitor with scripted randomness (`test_utils`)
*/

pub mod fixtures;
pub mod notifier_stub;
pub mod test_utils;

pub use fixtures::{defibrillator, ventilator};
pub use notifier_stub::{FailingNotifier, FailingSink, RecordingNotifier, RecordingSink};
pub use test_utils::TestHarness;
