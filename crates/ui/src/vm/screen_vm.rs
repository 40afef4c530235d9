use compliance_core::model::{FlowPhase, FlowSnapshot, Intent, Outcome};

const TITLE: &str = "Interactive Compliance Training Demo";

const QUESTION_PROMPT: &str = "What is the primary purpose of compliance training?";
const CORRECT_OPTION: &str = "Ensure adherence to regulations and standards";
const WRONG_OPTION: &str = "Complete required hours of training";
const LEARNING_BODY: &str = "Compliance training ensures organizations and employees \
understand and follow regulatory requirements, reducing risks and maintaining ethical \
standards.";

/// A pressable control and the intent it dispatches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonVm {
    pub label: String,
    pub detail: Option<String>,
    pub intent: Intent,
}

impl ButtonVm {
    fn new(label: &str, intent: Intent) -> Self {
        Self {
            label: label.to_string(),
            detail: None,
            intent,
        }
    }

    fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub heading: String,
    pub prompt: String,
    pub options: Vec<ButtonVm>,
}

/// What the renderer should show for one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenVm {
    ChooseApproach {
        heading: String,
        choices: Vec<ButtonVm>,
    },
    Loading {
        heading: String,
        percent: u8,
        label: String,
    },
    KnowledgeCheck(QuestionVm),
    PreTest(QuestionVm),
    LearningModule {
        heading: String,
        body: String,
        complete: ButtonVm,
    },
    Result {
        outcome: Outcome,
        heading: String,
        message: String,
        restart: ButtonVm,
    },
}

impl ScreenVm {
    /// Card title shown above every screen.
    #[must_use]
    pub fn title(&self) -> &'static str {
        TITLE
    }

    /// Every intent the screen currently offers.
    #[must_use]
    pub fn intents(&self) -> Vec<Intent> {
        match self {
            Self::ChooseApproach { choices, .. } => choices.iter().map(|b| b.intent).collect(),
            Self::Loading { .. } => Vec::new(),
            Self::KnowledgeCheck(question) | Self::PreTest(question) => {
                question.options.iter().map(|b| b.intent).collect()
            }
            Self::LearningModule { complete, .. } => vec![complete.intent],
            Self::Result { restart, .. } => vec![restart.intent],
        }
    }
}

fn question(heading: &str) -> QuestionVm {
    QuestionVm {
        heading: heading.to_string(),
        prompt: QUESTION_PROMPT.to_string(),
        options: vec![
            ButtonVm::new(CORRECT_OPTION, Intent::Answer { correct: true }),
            ButtonVm::new(WRONG_OPTION, Intent::Answer { correct: false }),
        ],
    }
}

#[must_use]
pub fn map_screen(snapshot: &FlowSnapshot) -> ScreenVm {
    match snapshot.phase() {
        FlowPhase::Select => ScreenVm::ChooseApproach {
            heading: "Choose Your Training Approach:".to_string(),
            choices: vec![
                ButtonVm::new("Traditional Locked Approach", Intent::SelectTraditional)
                    .with_detail("Must complete full duration"),
                ButtonVm::new("Adaptive Pre-test Approach", Intent::SelectAdaptive)
                    .with_detail("Test your knowledge first"),
            ],
        },
        FlowPhase::TraditionalLoading => {
            let percent = snapshot.progress.percent();
            ScreenVm::Loading {
                heading: "Traditional Module Progress".to_string(),
                percent,
                label: format!("Please wait while the content loads... {percent}%"),
            }
        }
        FlowPhase::TraditionalCheck => ScreenVm::KnowledgeCheck(question("Knowledge Check")),
        FlowPhase::AdaptivePreTest => ScreenVm::PreTest(question("Pre-test Question")),
        FlowPhase::AdaptiveLearning => ScreenVm::LearningModule {
            heading: "Quick Learning Module".to_string(),
            body: LEARNING_BODY.to_string(),
            complete: ButtonVm::new("Complete Learning", Intent::CompleteLearning),
        },
        FlowPhase::Passed => result_screen(
            Outcome::Pass,
            "Congratulations!",
            "You've successfully completed the training.",
        ),
        FlowPhase::Failed => result_screen(
            Outcome::Fail,
            "Try Again",
            "Review the material and retry the assessment.",
        ),
    }
}

fn result_screen(outcome: Outcome, heading: &str, message: &str) -> ScreenVm {
    ScreenVm::Result {
        outcome,
        heading: heading.to_string(),
        message: message.to_string(),
        restart: ButtonVm::new("Try Another Approach", Intent::Restart),
    }
}
