use compliance_core::model::{FlowSnapshot, Intent};
use services::TrainingFlowController;
use tokio::sync::watch;
use tracing::debug;

use super::screen_vm::{ButtonVm, ScreenVm, map_screen};

/// Bridges the flow controller and a renderer: hands out screens, takes button presses.
pub struct FlowVm {
    controller: TrainingFlowController,
}

impl FlowVm {
    #[must_use]
    pub fn new(controller: TrainingFlowController) -> Self {
        Self { controller }
    }

    #[must_use]
    pub fn screen(&self) -> ScreenVm {
        map_screen(&self.controller.snapshot())
    }

    /// Receiver for re-rendering on ticks that happen between presses.
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<FlowSnapshot> {
        self.controller.subscribe()
    }

    /// Dispatches the button's intent if the current screen still offers it.
    ///
    /// A press on a button from a stale screen is dropped.
    pub fn press(&mut self, button: &ButtonVm) -> ScreenVm {
        let current = self.screen();
        if !current.intents().contains(&button.intent) {
            debug!(intent = ?button.intent, "ignoring press from a stale screen");
            return current;
        }
        self.dispatch(button.intent)
    }

    pub fn dispatch(&mut self, intent: Intent) -> ScreenVm {
        map_screen(&self.controller.dispatch(intent))
    }
}
