use std::sync::Arc;

use compliance_core::model::Effect;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

use super::shared::SharedFlow;

/// Exclusive handle to the task that advances the loading progress.
///
/// Cancellation is idempotent: only a task that is still running gets aborted,
/// and only once. A task that reached 100% ends by itself and is never aborted.
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct TickHandle {
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl TickHandle {
    /// True while the tick task is still running.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Aborts the tick task if it is still running.
    ///
    /// Returns `true` only for the call that actually aborted the task.
    pub fn cancel(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        if task.is_finished() {
            return false;
        }
        task.abort();
        debug!(generation = self.generation, "progress ticker cancelled");
        true
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawns the repeating progress tick for the session `generation`.
///
/// The first tick fires one full period after spawning. The task ends on its own
/// when a tick reports [`Effect::TickerFinished`], or when it observes a newer
/// generation.
pub(crate) fn spawn_ticker(runtime: &Handle, shared: Arc<SharedFlow>, generation: u64) -> TickHandle {
    let period = shared.settings().period();
    debug!(generation, ?period, "progress ticker started");

    let task = runtime.spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let Some(applied) = shared.apply_tick(generation) else {
                break;
            };
            if applied.effect == Some(Effect::TickerFinished) {
                debug!(generation, phase = ?applied.phase, "progress ticker finished");
                break;
            }
        }
    });

    TickHandle {
        task: Some(task),
        generation,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use compliance_core::model::{FlowPhase, Intent, Progress};
    use compliance_core::{Clock, TickSettings};

    use super::*;

    fn loading_flow() -> (Arc<SharedFlow>, u64) {
        let shared = Arc::new(SharedFlow::new(TickSettings::default(), Clock::default_clock()));
        let applied = shared.apply_intent(Intent::SelectTraditional);
        (shared, applied.generation)
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_once() {
        let (shared, generation) = loading_flow();
        let mut handle = spawn_ticker(&Handle::current(), Arc::clone(&shared), generation);
        assert!(handle.is_live());

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(!handle.is_live());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(shared.snapshot().progress, Progress::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_ticker_is_not_cancelled() {
        let (shared, generation) = loading_flow();
        let mut handle = spawn_ticker(&Handle::current(), Arc::clone(&shared), generation);

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        tokio::task::yield_now().await;

        assert_eq!(shared.snapshot().progress, Progress::COMPLETE);
        assert_eq!(shared.snapshot().phase(), FlowPhase::TraditionalCheck);
        assert!(!handle.is_live());
        assert!(!handle.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_stops_without_mutating() {
        let (shared, generation) = loading_flow();
        shared.apply_intent(Intent::Restart);
        let handle = spawn_ticker(&Handle::current(), Arc::clone(&shared), generation);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        tokio::task::yield_now().await;

        assert!(shared.snapshot().is_initial());
        assert!(!handle.is_live());
    }
}
