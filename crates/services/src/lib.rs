#![forbid(unsafe_code)]

pub mod error;
pub mod flow;

pub use compliance_core::Clock;

pub use error::FlowError;
pub use flow::{TickHandle, TrainingFlowController};
