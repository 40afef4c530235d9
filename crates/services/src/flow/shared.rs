use std::sync::{Mutex, MutexGuard, PoisonError};

use compliance_core::model::{Effect, FlowEvent, FlowPhase, FlowSnapshot, FlowState, Intent};
use compliance_core::{Clock, TickSettings};
use tokio::sync::watch;
use tracing::{debug, info};

/// What the caller needs to know after an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Applied {
    pub phase: FlowPhase,
    pub effect: Option<Effect>,
    pub generation: u64,
}

struct FlowInner {
    state: FlowState,
    // Bumped on every restart; ticks carry the value they were started with.
    generation: u64,
}

/// State bundle shared between the controller and its tick task.
///
/// Every mutation goes through [`SharedFlow::apply_intent`] or
/// [`SharedFlow::apply_tick`], which hold the lock while
/// transitioning and publishing, so snapshots are observed in transition order.
pub(crate) struct SharedFlow {
    inner: Mutex<FlowInner>,
    snapshots: watch::Sender<FlowSnapshot>,
    settings: TickSettings,
    clock: Clock,
}

impl SharedFlow {
    pub(crate) fn new(settings: TickSettings, clock: Clock) -> Self {
        let state = FlowState::initial();
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            inner: Mutex::new(FlowInner {
                state,
                generation: 0,
            }),
            snapshots,
            settings,
            clock,
        }
    }

    pub(crate) fn settings(&self) -> &TickSettings {
        &self.settings
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshots.subscribe()
    }

    pub(crate) fn snapshot(&self) -> FlowSnapshot {
        self.snapshots.borrow().clone()
    }

    fn lock(&self) -> MutexGuard<'_, FlowInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a user intent.
    pub(crate) fn apply_intent(&self, intent: Intent) -> Applied {
        let mut inner = self.lock();
        self.apply_locked(&mut inner, FlowEvent::Intent(intent))
    }

    /// Applies a tick started for `generation`.
    ///
    /// Returns `None` without touching state when the session was restarted since.
    pub(crate) fn apply_tick(&self, generation: u64) -> Option<Applied> {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(
                tick_generation = generation,
                current_generation = inner.generation,
                "ignoring tick from a restarted session"
            );
            return None;
        }
        Some(self.apply_locked(&mut inner, FlowEvent::Tick))
    }

    fn apply_locked(&self, inner: &mut FlowInner, event: FlowEvent) -> Applied {
        let from = inner.state.phase();
        let transition = inner.state.apply(event, &self.settings, self.clock.now());
        let changed = transition.changed_from(&inner.state);

        if matches!(event, FlowEvent::Intent(Intent::Restart)) {
            inner.generation = inner.generation.wrapping_add(1);
        }
        inner.state = transition.state;
        let to = inner.state.phase();

        if changed {
            debug!(
                ?event,
                ?from,
                ?to,
                progress = inner.state.progress().percent(),
                "flow transition"
            );
            log_milestone(from, &inner.state);
            self.snapshots.send_replace(inner.state.snapshot());
        }

        Applied {
            phase: to,
            effect: transition.effect,
            generation: inner.generation,
        }
    }
}

fn log_milestone(from: FlowPhase, state: &FlowState) {
    let to = state.phase();
    if from == FlowPhase::Select && to != FlowPhase::Select {
        info!(mode = ?state.mode(), "training session started");
    }
    if let Some(outcome) = state.outcome().filter(|_| !from.is_terminal()) {
        info!(mode = ?state.mode(), ?outcome, "training session finished");
    }
    if to == FlowPhase::Select && from != FlowPhase::Select {
        info!("training session restarted");
    }
}
