use serde::{Deserialize, Serialize};

/// Training approach chosen on the start screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Nothing chosen yet.
    #[default]
    Select,
    /// Locked module: wait for the full duration, then a knowledge check.
    Traditional,
    /// Pre-test first, remedial learning only when it is missed.
    Adaptive,
}

/// Prompt or activity currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    TraditionalCheck,
    PreTest,
    LearningModule,
}

/// Final outcome of a training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Composite state of a session, derived from mode, question and outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Select,
    TraditionalLoading,
    TraditionalCheck,
    AdaptivePreTest,
    AdaptiveLearning,
    Passed,
    Failed,
}

impl FlowPhase {
    /// Classifies a (mode, question, outcome) triple. An outcome always wins.
    #[must_use]
    pub fn of(mode: Mode, question: Option<Question>, outcome: Option<Outcome>) -> Self {
        match (outcome, mode, question) {
            (Some(Outcome::Pass), _, _) => Self::Passed,
            (Some(Outcome::Fail), _, _) => Self::Failed,
            (None, Mode::Select, _) => Self::Select,
            (None, Mode::Traditional, None) => Self::TraditionalLoading,
            (None, Mode::Traditional, Some(_)) => Self::TraditionalCheck,
            (None, Mode::Adaptive, Some(Question::LearningModule)) => Self::AdaptiveLearning,
            (None, Mode::Adaptive, _) => Self::AdaptivePreTest,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}
