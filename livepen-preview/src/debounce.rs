//! Reset-on-activity debounce.
//! A burst of `notify()` calls collapses into one fire, timed from the last call.

use crate::error::{PreviewError, PreviewResult};
use crate::lock;
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default quiet period before a rebuild (same as the original editor).
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Deadline used when `now + delay` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Callback run when a debounce window closes.
pub type FireCallback = Arc<dyn Fn() + Send + Sync>;

/// The single live timer of a scheduler.
struct PendingRebuild {
    generation: u64,
    deadline: Instant,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct SchedulerState {
    pending: Option<PendingRebuild>,
    /// Bumped on every notify; a timer only fires if it still owns the latest generation.
    generation: u64,
    disposed: bool,
    fire_count: u64,
}

pub struct DebounceScheduler {
    delay: Duration,
    runtime: Handle,
    state: Arc<Mutex<SchedulerState>>,
    on_fire: FireCallback,
}

impl DebounceScheduler {
    /// Creates a scheduler on the current tokio runtime.
    pub fn new<F>(delay: Duration, on_fire: F) -> PreviewResult<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| PreviewError::NoRuntime)?;
        Ok(Self::with_handle(delay, runtime, on_fire))
    }

    pub fn with_handle<F>(delay: Duration, runtime: Handle, on_fire: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            delay,
            runtime,
            state: Arc::new(Mutex::new(SchedulerState::default())),
            on_fire: Arc::new(on_fire),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records activity: cancels any pending timer and starts a new one for `delay`.
    /// No-op after `dispose()`.
    pub fn notify(&self) {
        let mut state = lock(&self.state);
        if state.disposed {
            return;
        }
        if let Some(previous) = state.pending.take() {
            previous.handle.abort();
            debug!("debounce reset (generation {})", previous.generation);
        }

        state.generation += 1;
        let generation = state.generation;
        let now = Instant::now();
        let deadline = now.checked_add(self.delay).unwrap_or(now + FAR_FUTURE);
        let weak = Arc::downgrade(&self.state);
        let on_fire = self.on_fire.clone();

        // The state lock is held until `pending` is stored, so the task can never
        // observe a window where its own generation is missing.
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let live = {
                let mut state = lock(&shared);
                let owns_window = !state.disposed
                    && state
                        .pending
                        .as_ref()
                        .is_some_and(|p| p.generation == generation);
                if owns_window {
                    state.pending = None;
                    state.fire_count += 1;
                }
                owns_window
            };
            if live {
                debug!("debounce fired (generation {})", generation);
                on_fire();
            }
        });

        state.pending = Some(PendingRebuild {
            generation,
            deadline,
            handle,
        });
    }

    /// Drops the pending timer without firing. The scheduler stays usable.
    pub fn cancel(&self) -> bool {
        let mut state = lock(&self.state);
        match state.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels the live timer and refuses every later `notify()`.
    pub fn dispose(&self) {
        let mut state = lock(&self.state);
        state.disposed = true;
        if let Some(pending) = state.pending.take() {
            pending.handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }

    /// Target fire time of the pending rebuild, if any.
    pub fn deadline(&self) -> Option<Instant> {
        lock(&self.state).pending.as_ref().map(|p| p.deadline)
    }

    pub fn fire_count(&self) -> u64 {
        lock(&self.state).fire_count
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.dispose();
    }
}
