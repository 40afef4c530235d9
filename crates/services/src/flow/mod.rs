mod controller;
mod shared;
mod ticker;

// Public API of the training flow subsystem.
pub use crate::error::FlowError;
pub use controller::TrainingFlowController;
pub use ticker::TickHandle;
