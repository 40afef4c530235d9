use std::sync::Arc;

use compliance_core::model::{Effect, FlowSnapshot, Intent};
use compliance_core::{Clock, TickSettings};
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::shared::SharedFlow;
use super::ticker::{TickHandle, spawn_ticker};
use crate::error::FlowError;

/// Owns one training session: its state bundle, the progress ticker and the
/// snapshot channel read by the renderer.
///
/// Intents are plain method calls and never fail; an intent that means nothing in
/// the current state is ignored. Every call returns the snapshot after the intent.
pub struct TrainingFlowController {
    shared: Arc<SharedFlow>,
    runtime: Handle,
    ticker: Option<TickHandle>,
}

impl TrainingFlowController {
    /// Create a controller on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Settings` for invalid tick settings and
    /// `FlowError::NoRuntime` when called outside a tokio runtime.
    pub fn new(settings: TickSettings) -> Result<Self, FlowError> {
        Self::with_clock(settings, Clock::default_clock())
    }

    /// Same as [`TrainingFlowController::new`] with an explicit clock for timestamps.
    ///
    /// # Errors
    ///
    /// See [`TrainingFlowController::new`].
    pub fn with_clock(settings: TickSettings, clock: Clock) -> Result<Self, FlowError> {
        settings.validate()?;
        let runtime = Handle::try_current().map_err(|_| FlowError::NoRuntime)?;
        Ok(Self {
            shared: Arc::new(SharedFlow::new(settings, clock)),
            runtime,
            ticker: None,
        })
    }

    #[must_use]
    pub fn settings(&self) -> TickSettings {
        *self.shared.settings()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        self.shared.snapshot()
    }

    /// Receiver notified after every state change, ticks included.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.shared.subscribe()
    }

    /// True while a progress tick task is running.
    #[must_use]
    pub fn has_live_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickHandle::is_live)
    }

    pub fn select_traditional(&mut self) -> FlowSnapshot {
        self.dispatch(Intent::SelectTraditional)
    }

    pub fn select_adaptive(&mut self) -> FlowSnapshot {
        self.dispatch(Intent::SelectAdaptive)
    }

    pub fn answer(&mut self, correct: bool) -> FlowSnapshot {
        self.dispatch(Intent::Answer { correct })
    }

    pub fn complete_learning(&mut self) -> FlowSnapshot {
        self.dispatch(Intent::CompleteLearning)
    }

    pub fn restart(&mut self) -> FlowSnapshot {
        self.dispatch(Intent::Restart)
    }

    /// Apply any user intent.
    pub fn dispatch(&mut self, intent: Intent) -> FlowSnapshot {
        // The ticker must be gone before the state it mutates is cleared.
        if intent == Intent::Restart {
            self.cancel_ticker();
        }

        let applied = self.shared.apply_intent(intent);
        match applied.effect {
            Some(Effect::StartTicker) => {
                self.cancel_ticker();
                self.ticker = Some(spawn_ticker(
                    &self.runtime,
                    Arc::clone(&self.shared),
                    applied.generation,
                ));
            }
            Some(Effect::StopTicker) => {
                self.ticker = None;
            }
            Some(Effect::TickerFinished) | None => {}
        }

        self.snapshot()
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
