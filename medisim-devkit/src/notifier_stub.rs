/*!
Collaborator stubs

Recording variants keep everything they receive for later assertions.
Failing variants reject every call, to check that delivery problems never
leak into device state.
*/

use futures::future::{self, BoxFuture, FutureExt};
use medisim_engine::{AlertNotice, LogEntry};
use medisim_monitor::{LogSink, Notifier};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<AlertNotice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<AlertNotice> {
        self.notices.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify(&self, notice: AlertNotice) -> BoxFuture<'static, anyhow::Result<()>> {
        self.notices.lock().push(notice);
        future::ready(Ok(())).boxed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn notify(&self, notice: AlertNotice) -> BoxFuture<'static, anyhow::Result<()>> {
        future::ready(Err(anyhow::anyhow!("mail relay refused alert for {}", notice.device))).boxed()
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

impl LogSink for RecordingSink {
    fn record(&self, entry: LogEntry) -> anyhow::Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl LogSink for FailingSink {
    fn record(&self, entry: LogEntry) -> anyhow::Result<()> {
        anyhow::bail!("log store unavailable, dropped '{}'", entry.message)
    }
}
