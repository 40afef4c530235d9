mod flow;
mod intent;
mod progress;
mod state;

pub use flow::{FlowPhase, Mode, Outcome, Question};
pub use intent::{Effect, FlowEvent, Intent};
pub use progress::{Progress, ProgressError};
pub use state::{FlowSnapshot, FlowState, Transition};
