// Debounced dispatcher - coalesces bursts of parameter changes
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Logical timer slots. Triggers on the same channel replace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebounceChannel {
    /// Echogram refreshes. Color scale changes wait here; point, channel and
    /// time window changes dispatch immediately and drop the waiting one.
    RenderParams,
}

pub struct DebouncedDispatcher {
    quiet_period: Duration,
    pending: HashMap<DebounceChannel, JoinHandle<()>>,
}

impl DebouncedDispatcher {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: HashMap::new(),
        }
    }

    /// Run `trigger` once the channel has been quiet for the full period.
    /// Any trigger still pending on the channel is dropped.
    pub fn schedule<F>(&mut self, channel: DebounceChannel, trigger: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel(channel) {
            tracing::trace!("Restarting debounce timer for {:?}", channel);
        }
        let quiet_period = self.quiet_period;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            trigger();
        });
        self.pending.insert(channel, handle);
    }

    /// Run `trigger` now, dropping whatever was pending on the channel.
    pub fn dispatch_immediate<F, R>(&mut self, channel: DebounceChannel, trigger: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.cancel(channel);
        trigger()
    }

    /// Returns true if a trigger was still waiting to fire.
    pub fn cancel(&mut self, channel: DebounceChannel) -> bool {
        match self.pending.remove(&channel) {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self, channel: DebounceChannel) -> bool {
        self.pending.get(&channel).is_some_and(|handle| !handle.is_finished())
    }

    pub fn shutdown(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl Drop for DebouncedDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
