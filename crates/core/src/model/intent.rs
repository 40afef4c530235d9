use serde::{Deserialize, Serialize};

/// Discrete user actions dispatched by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Intent {
    SelectTraditional,
    SelectAdaptive,
    Answer { correct: bool },
    CompleteLearning,
    Restart,
}

/// Everything that can drive a transition: user intents plus timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowEvent {
    Intent(Intent),
    Tick,
}

impl From<Intent> for FlowEvent {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}

/// Side effect requested by a transition. The ticker is the only scheduled effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Begin the repeating progress tick.
    StartTicker,
    /// Cancel any live tick task (restart).
    StopTicker,
    /// The tick task reached 100% and must end on its own; do not cancel it.
    TickerFinished,
}
