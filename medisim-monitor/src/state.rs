use medisim_engine::{DeviceKind, DeviceState};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

/// Latest state per device, as read by the HTTP layer.
pub type DeviceBoard = BTreeMap<DeviceKind, DeviceState>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
