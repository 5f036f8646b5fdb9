use std::time::Duration;
use tokio::task::JoinHandle;

/// A one-shot action run on the tokio timer after a delay.
///
/// Cancelling (or dropping) the handle before the delay elapses guarantees the
/// action never runs. Must be created from within a tokio runtime.
#[derive(Debug)]
pub struct ScheduledAction {
    label: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledAction {
    pub fn after<F>(label: &'static str, delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!(action = label, "Scheduled action fired");
            action();
        });
        Self {
            label,
            handle: Some(handle),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    pub fn cancel(self) {
        // Drop aborts.
    }

    /// Releases the handle without aborting. Used by the action itself once it
    /// has fired and clears its own slot.
    pub fn disarm(mut self) {
        self.handle.take();
    }
}

impl Drop for ScheduledAction {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::trace!(action = self.label, "Scheduled action cancelled");
            }
            handle.abort();
        }
    }
}
